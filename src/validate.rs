//! Field-level acceptance rules applied before anything is written.
//!
//! Only student inserts and delete targets go through here. Course and admin
//! inserts are deliberately unchecked beyond what SQLite itself rejects.

use crate::error::ValidationError;
use crate::models::{House, NewStudent, StudentDraft, Year};

/// Accept only the literal strings "1" through "7". No trimming and no
/// leading zeros, so " 5" and "05" are both rejected.
pub fn year(raw: &str) -> Result<Year, ValidationError> {
    let invalid = || ValidationError::InvalidYear(raw.to_string());
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(digit), None) => digit
            .to_digit(10)
            .and_then(|value| Year::new(value as u8))
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Case-exact match against the four houses.
pub fn house(raw: &str) -> Result<House, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::InvalidHouse(raw.to_string()))
}

/// Check a student draft. Year is checked before house so a draft that is
/// wrong on both counts reports `InvalidYear`. The name is stored as typed.
pub fn student(draft: &StudentDraft) -> Result<NewStudent, ValidationError> {
    let year = year(&draft.year)?;
    let house = house(&draft.house)?;
    Ok(NewStudent {
        name: draft.name.clone(),
        house,
        year,
    })
}

/// Trim a delete target and reject it when nothing is left.
pub fn delete_target(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_school_year() {
        for value in 1..=7u8 {
            let parsed = year(&value.to_string()).unwrap();
            assert_eq!(parsed.get(), value);
        }
    }

    #[test]
    fn rejects_years_outside_the_literal_set() {
        for raw in ["0", "8", "9", "", " 5", "5 ", "05", "-1", "1.0", "seven", "٣"] {
            assert_eq!(
                year(raw),
                Err(ValidationError::InvalidYear(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn house_matching_is_case_exact() {
        assert_eq!(house("Ravenclaw"), Ok(House::Ravenclaw));
        assert_eq!(house("Hufflepuff"), Ok(House::Hufflepuff));
        for raw in ["ravenclaw", "RAVENCLAW", " Ravenclaw", "Durmstrang", ""] {
            assert_eq!(
                house(raw),
                Err(ValidationError::InvalidHouse(raw.to_string()))
            );
        }
    }

    #[test]
    fn student_reports_year_before_house() {
        let draft = StudentDraft::new("X", "Nowhere", "9");
        assert_eq!(
            student(&draft),
            Err(ValidationError::InvalidYear("9".to_string()))
        );
    }

    #[test]
    fn student_keeps_name_untouched() {
        let draft = StudentDraft::new("  Luna Lovegood ", "Ravenclaw", "5");
        let student = student(&draft).unwrap();
        assert_eq!(student.name, "  Luna Lovegood ");
        assert_eq!(student.house, House::Ravenclaw);
        assert_eq!(student.year.get(), 5);
    }

    #[test]
    fn delete_target_trims_and_rejects_blank() {
        assert_eq!(delete_target("  Alchemy \n"), Ok("Alchemy"));
        assert_eq!(delete_target("   "), Err(ValidationError::EmptyName));
        assert_eq!(delete_target(""), Err(ValidationError::EmptyName));
    }
}
