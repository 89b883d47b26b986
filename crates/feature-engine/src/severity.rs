//! Damage severity score

use data_validator::PaintCondition;

/// Severity of the reported paint condition: 0 clean, 1 cosmetic or unknown, 2 replaced parts
pub fn damage_severity(condition: PaintCondition) -> u8 {
    match condition {
        PaintCondition::Original => 0,
        PaintCondition::LocalPaint | PaintCondition::Painted => 1,
        PaintCondition::Replaced => 2,
        PaintCondition::Unspecified => 1,
    }
}
