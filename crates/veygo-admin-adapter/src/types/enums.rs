/*
[INPUT]:  Veygo API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmployeeTier {
    User,
    GeneralEmployee,
    Maintenance,
    Admin,
}

impl EmployeeTier {
    /// Anything above a plain renter account.
    pub fn is_staff(self) -> bool {
        self != EmployeeTier::User
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanTier {
    Free,
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[serde(rename = "PNTS")]
    PreferNotToSay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&EmployeeTier::GeneralEmployee).unwrap(),
            "\"GeneralEmployee\""
        );
        assert_eq!(
            serde_json::to_string(&PlanTier::Platinum).unwrap(),
            "\"Platinum\""
        );
        let gender: Gender = serde_json::from_str("\"PNTS\"").unwrap();
        assert_eq!(gender, Gender::PreferNotToSay);
    }

    #[test]
    fn test_employee_tier_is_staff() {
        assert!(!EmployeeTier::User.is_staff());
        assert!(EmployeeTier::Maintenance.is_staff());
        assert!(EmployeeTier::Admin > EmployeeTier::GeneralEmployee);
    }
}
