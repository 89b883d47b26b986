//! Repository Implementation

use crate::columns::ColumnMapping;
use crate::vocabulary::ReferenceVocabulary;
use crate::ReferenceDataError;
use data_validator::{parse_dataset_number, CategoricalField, NumericField, NumericInput, PaintCondition, RawVehicleInput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// One row of the reference dataset, kept as raw form input
#[derive(Debug, Clone, Serialize)]
pub struct VehicleListing {
    /// Row values in form shape; numerics stay as text until cleaned
    pub input: RawVehicleInput,
    /// Asking price, when the dataset has one
    pub price: Option<f64>,
}

/// Current selection used to narrow the options
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionQuery {
    pub brand: Option<String>,
    pub series: Option<String>,
    pub model: Option<String>,
}

/// Selectable values for each form field
#[derive(Debug, Clone, Default, Serialize)]
pub struct OptionSet {
    pub brands: Vec<String>,
    pub series: Vec<String>,
    pub models: Vec<String>,
    pub transmission_types: Vec<String>,
    pub fuel_types: Vec<String>,
    pub body_types: Vec<String>,
    pub colors: Vec<String>,
    pub drivetrain_types: Vec<String>,
    pub paint_conditions: Vec<PaintCondition>,
}

/// Dataset statistics
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub listings: usize,
    pub brands: usize,
    pub series: usize,
    pub models: usize,
    pub mean_price: Option<f64>,
}

/// Read-only reference dataset
pub struct Repository {
    /// Parsed rows
    listings: Vec<VehicleListing>,
    /// Vocabulary derived from the rows
    vocabulary: ReferenceVocabulary,
}

struct ColumnIndex {
    categorical: Vec<(CategoricalField, usize)>,
    numeric: Vec<(NumericField, usize)>,
    paint_condition: Option<usize>,
    price: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, mapping: &ColumnMapping) -> Result<Self, ReferenceDataError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let mut categorical = Vec::with_capacity(CategoricalField::ALL.len());
        for field in CategoricalField::ALL {
            let header = mapping.categorical(field);
            let idx = find(header).ok_or_else(|| ReferenceDataError::MissingColumn(header.to_string()))?;
            categorical.push((field, idx));
        }

        let mut numeric = Vec::with_capacity(NumericField::ALL.len());
        for field in NumericField::ALL {
            let header = mapping.numeric(field);
            match find(header) {
                Some(idx) => numeric.push((field, idx)),
                None => warn!("Column '{}' not found, {} will use its default", header, field.name()),
            }
        }

        Ok(Self {
            categorical,
            numeric,
            paint_condition: mapping.paint_condition.as_deref().and_then(find),
            price: mapping.price.as_deref().and_then(find),
        })
    }

    fn listing(&self, record: &csv::StringRecord) -> VehicleListing {
        let cell = |idx: usize| record.get(idx).map(str::trim).filter(|v| !v.is_empty());

        let mut input = RawVehicleInput::default();
        for &(field, idx) in &self.categorical {
            let value = cell(idx).unwrap_or_default().to_string();
            match field {
                CategoricalField::Brand => input.brand = value,
                CategoricalField::Series => input.series = value,
                CategoricalField::Model => input.model = value,
                CategoricalField::TransmissionType => input.transmission_type = value,
                CategoricalField::FuelType => input.fuel_type = value,
                CategoricalField::BodyType => input.body_type = value,
                CategoricalField::Color => input.color = value,
                CategoricalField::DrivetrainType => input.drivetrain_type = value,
            }
        }
        for &(field, idx) in &self.numeric {
            let value = cell(idx).map(|text| match parse_dataset_number(text) {
                Some(number) => NumericInput::Number(number),
                None => NumericInput::from(text),
            });
            match field {
                NumericField::MileageKm => input.mileage_km = value,
                NumericField::ModelYear => input.model_year = value,
                NumericField::EngineDisplacementCc => input.engine_displacement_cc = value,
                NumericField::EnginePowerHp => input.engine_power_hp = value,
                NumericField::AnnualTaxAmount => input.annual_tax_amount = value,
                NumericField::DamageCompensationAmount => input.damage_compensation_amount = value,
            }
        }
        input.paint_condition = self
            .paint_condition
            .and_then(cell)
            .and_then(PaintCondition::from_label)
            .unwrap_or_default();

        VehicleListing {
            input,
            price: self.price.and_then(cell).and_then(parse_dataset_number),
        }
    }
}

fn distinct<'a, I: Iterator<Item = &'a str>>(values: I) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl Repository {
    /// Load the reference dataset from a CSV file
    pub fn load(path: impl AsRef<Path>, mapping: &ColumnMapping) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ReferenceDataError::DatasetNotFound(path.display().to_string()));
        }

        info!("Loading reference dataset from {}", path.display());
        let reader = csv::Reader::from_path(path)?;
        Self::from_csv(reader, mapping)
    }

    /// Load the reference dataset from any CSV source
    pub fn from_reader<R: io::Read>(reader: R, mapping: &ColumnMapping) -> Result<Self, ReferenceDataError> {
        Self::from_csv(csv::Reader::from_reader(reader), mapping)
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>, mapping: &ColumnMapping) -> Result<Self, ReferenceDataError> {
        let headers = reader.headers()?.clone();
        let index = ColumnIndex::resolve(&headers, mapping)?;

        let mut listings = Vec::new();
        for record in reader.records() {
            listings.push(index.listing(&record?));
        }

        Self::from_listings(listings)
    }

    /// Build a repository from already parsed listings
    pub fn from_listings(listings: Vec<VehicleListing>) -> Result<Self, ReferenceDataError> {
        if listings.is_empty() {
            return Err(ReferenceDataError::Empty);
        }

        let vocabulary = ReferenceVocabulary::from_listings(&listings);
        info!(
            "Reference dataset ready: {} listings, {} brands, {} colors",
            listings.len(),
            vocabulary.len(CategoricalField::Brand),
            vocabulary.len(CategoricalField::Color)
        );

        Ok(Self { listings, vocabulary })
    }

    /// Category vocabulary
    pub fn vocabulary(&self) -> &ReferenceVocabulary {
        &self.vocabulary
    }

    /// Get a listing by row index
    pub fn listing(&self, index: usize) -> Result<&VehicleListing, ReferenceDataError> {
        self.listings.get(index).ok_or(ReferenceDataError::NotFound(index))
    }

    /// Total listing count
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the repository holds no listings
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Options narrowed by the selection.
    ///
    /// Series are listed once a brand is chosen, models once a series is
    /// chosen, and the technical fields once a model is chosen. Unlocked lists
    /// stay empty.
    pub fn filtered_options(&self, query: &OptionQuery) -> OptionSet {
        let matches = |listing: &&VehicleListing| {
            let input = &listing.input;
            query.brand.as_deref().map_or(true, |b| input.brand == b)
                && query.series.as_deref().map_or(true, |s| input.series == s)
                && query.model.as_deref().map_or(true, |m| input.model == m)
        };
        let filtered: Vec<&VehicleListing> = self.listings.iter().filter(matches).collect();
        let column = |field: CategoricalField| distinct(filtered.iter().map(|l| field.of_raw(&l.input)));

        let has_model = query.model.is_some();
        let unlocked = |enabled: bool, field: CategoricalField| if enabled { column(field) } else { Vec::new() };

        debug!("Option filter matched {} of {} listings", filtered.len(), self.listings.len());

        OptionSet {
            brands: self.vocabulary.values(CategoricalField::Brand).to_vec(),
            series: unlocked(query.brand.is_some(), CategoricalField::Series),
            models: unlocked(query.series.is_some(), CategoricalField::Model),
            transmission_types: unlocked(has_model, CategoricalField::TransmissionType),
            fuel_types: unlocked(has_model, CategoricalField::FuelType),
            body_types: unlocked(has_model, CategoricalField::BodyType),
            colors: self.vocabulary.values(CategoricalField::Color).to_vec(),
            drivetrain_types: unlocked(has_model, CategoricalField::DrivetrainType),
            paint_conditions: PaintCondition::ALL.to_vec(),
        }
    }

    /// Options for the form: filtered, with technical fields falling back to
    /// the full vocabulary when the selection leaves them empty
    pub fn options(&self, query: &OptionQuery) -> OptionSet {
        let mut options = self.filtered_options(query);
        let global = |field: CategoricalField| self.vocabulary.values(field).to_vec();

        for (list, field) in [
            (&mut options.transmission_types, CategoricalField::TransmissionType),
            (&mut options.fuel_types, CategoricalField::FuelType),
            (&mut options.body_types, CategoricalField::BodyType),
            (&mut options.drivetrain_types, CategoricalField::DrivetrainType),
        ] {
            if list.is_empty() {
                *list = global(field);
            }
        }

        options
    }

    /// Dataset statistics
    pub fn summary(&self) -> DatasetSummary {
        let prices: Vec<f64> = self.listings.iter().filter_map(|l| l.price).collect();
        let mean_price = if prices.is_empty() {
            None
        } else {
            Some(prices.iter().sum::<f64>() / prices.len() as f64)
        };

        DatasetSummary {
            listings: self.listings.len(),
            brands: self.vocabulary.len(CategoricalField::Brand),
            series: self.vocabulary.len(CategoricalField::Series),
            models: self.vocabulary.len(CategoricalField::Model),
            mean_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = "\
marka,seri,model,kilometre(Km),yıl,vitesTipi,yakitTuru,kasaTipi,renk,motorHacmi(Cc),motorGucu(HP),cekisTipi,aracVergisi(TRY),hasarGecmisi,fiyat
Toyota,Corolla,1.6,2020,\"50.000\",Otomatik,Benzin,Sedan,Beyaz,1598 cc,132 hp,Önden Çekiş,\"2.500\",0,\"900.000\"
Toyota,Corolla,1.4 D-4D,2016,\"120.000\",Düz,Dizel,Sedan,Gri,1364 cc,90 hp,Önden Çekiş,\"1.200\",\"5.000\",\"600.000\"
Toyota,C-HR,1.8 Hybrid,2021,\"30.000\",Otomatik,Hibrit,SUV,Kırmızı,1798 cc,122 hp,Önden Çekiş,\"3.100\",0,\"1.200.000\"
Renault,Clio,1.0 TCe,2022,\"15.000\",Düz,Benzin,Hatchback,Beyaz,999 cc,90 hp,Önden Çekiş,\"1.100\",0,
";

    fn repository() -> Repository {
        Repository::from_reader(DATASET.as_bytes(), &ColumnMapping::default()).unwrap()
    }

    #[test]
    fn test_load_and_vocabulary() {
        let repo = repository();
        assert_eq!(repo.len(), 4);

        let vocabulary = repo.vocabulary();
        assert_eq!(vocabulary.values(CategoricalField::Brand), &["Renault", "Toyota"]);
        assert_eq!(vocabulary.values(CategoricalField::Color), &["Beyaz", "Gri", "Kırmızı"]);
        assert_eq!(vocabulary.len(CategoricalField::Model), 4);
    }

    #[test]
    fn test_swapped_columns_remapped() {
        let repo = repository();
        let listing = repo.listing(0).unwrap();
        assert_eq!(listing.input.model_year, Some(NumericInput::Number(2020.0)));
        assert_eq!(listing.input.mileage_km, Some(NumericInput::Number(50_000.0)));
        assert_eq!(listing.input.engine_displacement_cc, Some(NumericInput::Number(1598.0)));
        assert_eq!(listing.price, Some(900_000.0));
    }

    #[test]
    fn test_machine_written_decimals() {
        let csv = "\
marka,seri,model,kilometre(Km),yıl,vitesTipi,yakitTuru,kasaTipi,renk,motorHacmi(Cc),motorGucu(HP),cekisTipi,aracVergisi(TRY),hasarGecmisi,fiyat
Fiat,Egea,1.3 Multijet,2019.0,85000.0,Düz,Dizel,Sedan,Beyaz,1248.0,95.0,Önden Çekiş,2500.0,12500.0,786610.0
";
        let repo = Repository::from_reader(csv.as_bytes(), &ColumnMapping::default()).unwrap();
        let listing = repo.listing(0).unwrap();

        assert_eq!(listing.input.annual_tax_amount, Some(NumericInput::Number(2500.0)));
        assert_eq!(listing.input.damage_compensation_amount, Some(NumericInput::Number(12500.0)));
        assert_eq!(listing.input.mileage_km, Some(NumericInput::Number(85000.0)));
        assert_eq!(listing.input.model_year, Some(NumericInput::Number(2019.0)));
        assert_eq!(listing.price, Some(786_610.0));
        assert_eq!(repo.summary().mean_price, Some(786_610.0));
    }

    #[test]
    fn test_unparseable_cell_kept_as_text() {
        let csv = "\
marka,seri,model,kilometre(Km),yıl,vitesTipi,yakitTuru,kasaTipi,renk,motorHacmi(Cc),motorGucu(HP),cekisTipi,aracVergisi(TRY),hasarGecmisi,fiyat
Fiat,Egea,1.3 Multijet,2019,-,Düz,Dizel,Sedan,Beyaz,1248,95,Önden Çekiş,2500,0,786610
";
        let repo = Repository::from_reader(csv.as_bytes(), &ColumnMapping::default()).unwrap();
        assert_eq!(repo.listing(0).unwrap().input.mileage_km, Some(NumericInput::Text("-".into())));
    }

    #[test]
    fn test_missing_categorical_column() {
        let csv = "marka,seri\nToyota,Corolla\n";
        let err = Repository::from_reader(csv.as_bytes(), &ColumnMapping::default()).err();
        assert!(matches!(err, Some(ReferenceDataError::MissingColumn(c)) if c == "model"));
    }

    #[test]
    fn test_missing_file() {
        let err = Repository::load("/nonexistent/cars.csv", &ColumnMapping::default()).err();
        assert!(matches!(err, Some(ReferenceDataError::DatasetNotFound(_))));
    }

    #[test]
    fn test_cascading_options() {
        let repo = repository();

        let none = repo.filtered_options(&OptionQuery::default());
        assert_eq!(none.brands, vec!["Renault", "Toyota"]);
        assert!(none.series.is_empty());

        let brand = repo.filtered_options(&OptionQuery {
            brand: Some("Toyota".into()),
            ..Default::default()
        });
        assert_eq!(brand.series, vec!["C-HR", "Corolla"]);
        assert!(brand.models.is_empty());

        let series = repo.filtered_options(&OptionQuery {
            brand: Some("Toyota".into()),
            series: Some("Corolla".into()),
            ..Default::default()
        });
        assert_eq!(series.models, vec!["1.4 D-4D", "1.6"]);
        assert!(series.fuel_types.is_empty());

        let model = repo.filtered_options(&OptionQuery {
            brand: Some("Toyota".into()),
            series: Some("Corolla".into()),
            model: Some("1.6".into()),
        });
        assert_eq!(model.fuel_types, vec!["Benzin"]);
        assert_eq!(model.transmission_types, vec!["Otomatik"]);
    }

    #[test]
    fn test_options_fall_back_to_vocabulary() {
        let repo = repository();
        let options = repo.options(&OptionQuery {
            brand: Some("Toyota".into()),
            ..Default::default()
        });
        assert_eq!(options.fuel_types, vec!["Benzin", "Dizel", "Hibrit"]);
        assert_eq!(options.paint_conditions.len(), 5);
    }

    #[test]
    fn test_summary() {
        let summary = repository().summary();
        assert_eq!(summary.listings, 4);
        assert_eq!(summary.brands, 2);
        assert_eq!(summary.series, 3);
        assert_eq!(summary.mean_price, Some(900_000.0));
    }
}
