//! Canonical clinical parameters and their aliases.
//!
//! Every place that needs to recognize a parameter name (field inference,
//! value lookup, sentence compilation) goes through [`CanonicalParam::from_name`].

use medassist_types::form::FieldKind;

const SEX_OPTIONS: &[&str] = &["female", "male", "other"];

const SMOKING_OPTIONS: &[&str] = &["never", "former", "current", "not current", "ever", "No Info"];

/// Parameters with a known kind and phrase, in compilation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalParam {
    Sex,
    Age,
    Bmi,
    Hba1c,
    Glucose,
    Hypertension,
    HeartDisease,
    SmokingHistory,
}

impl CanonicalParam {
    pub const ALL: [CanonicalParam; 8] = [
        CanonicalParam::Sex,
        CanonicalParam::Age,
        CanonicalParam::Bmi,
        CanonicalParam::Hba1c,
        CanonicalParam::Glucose,
        CanonicalParam::Hypertension,
        CanonicalParam::HeartDisease,
        CanonicalParam::SmokingHistory,
    ];

    /// Lowercase names that resolve to this parameter.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalParam::Sex => &["sex", "gender"],
            CanonicalParam::Age => &["age"],
            CanonicalParam::Bmi => &["bmi"],
            CanonicalParam::Hba1c => &["hba1c", "hba1c_level"],
            CanonicalParam::Glucose => &["glucose", "glucose_level", "blood_glucose_level"],
            CanonicalParam::Hypertension => &["hypertension"],
            CanonicalParam::HeartDisease => &["heart_disease", "heartdisease"],
            CanonicalParam::SmokingHistory => &["smoking_history", "smoking"],
        }
    }

    /// Resolve a parameter name case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|param| param.aliases().contains(&lowered.as_str()))
    }

    pub fn label(self) -> &'static str {
        match self {
            CanonicalParam::Sex => "Sex",
            CanonicalParam::Age => "Age",
            CanonicalParam::Bmi => "BMI",
            CanonicalParam::Hba1c => "HbA1c level",
            CanonicalParam::Glucose => "Blood glucose level",
            CanonicalParam::Hypertension => "Hypertension",
            CanonicalParam::HeartDisease => "Heart disease",
            CanonicalParam::SmokingHistory => "Smoking history",
        }
    }

    pub fn field_kind(self) -> FieldKind {
        match self {
            CanonicalParam::Sex => choice(SEX_OPTIONS),
            CanonicalParam::SmokingHistory => choice(SMOKING_OPTIONS),
            CanonicalParam::Age
            | CanonicalParam::Bmi
            | CanonicalParam::Hba1c
            | CanonicalParam::Glucose => FieldKind::Numeric,
            CanonicalParam::Hypertension | CanonicalParam::HeartDisease => FieldKind::Binary,
        }
    }

    /// Render one clause of the compiled sentence for a non-blank value.
    pub fn phrase(self, value: &str) -> String {
        match self {
            CanonicalParam::Sex | CanonicalParam::Age => value.to_string(),
            CanonicalParam::Bmi => format!("BMI {value}"),
            CanonicalParam::Hba1c => format!("HbA1c level {value}"),
            CanonicalParam::Glucose => format!("blood glucose level {value}"),
            CanonicalParam::Hypertension => condition_phrase("hypertension", value),
            CanonicalParam::HeartDisease => condition_phrase("heart disease", value),
            CanonicalParam::SmokingHistory => format!("smoking history {value}"),
        }
    }
}

fn choice(options: &[&str]) -> FieldKind {
    FieldKind::Choice {
        options: options.iter().map(|s| s.to_string()).collect(),
    }
}

fn condition_phrase(condition: &str, value: &str) -> String {
    match parse_flag(value) {
        Some(true) => format!("has {condition}"),
        Some(false) => format!("no {condition}"),
        None => format!("{condition} {value}"),
    }
}

/// Interpret a yes/no style answer.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(CanonicalParam::from_name("Sex"), Some(CanonicalParam::Sex));
        assert_eq!(CanonicalParam::from_name("GENDER"), Some(CanonicalParam::Sex));
        assert_eq!(
            CanonicalParam::from_name("blood_glucose_level"),
            Some(CanonicalParam::Glucose)
        );
        assert_eq!(
            CanonicalParam::from_name("HbA1c_level"),
            Some(CanonicalParam::Hba1c)
        );
        assert_eq!(CanonicalParam::from_name("cholesterol"), None);
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(CanonicalParam::Age.field_kind(), FieldKind::Numeric);
        assert_eq!(CanonicalParam::HeartDisease.field_kind(), FieldKind::Binary);
        match CanonicalParam::SmokingHistory.field_kind() {
            FieldKind::Choice { options } => assert!(options.contains(&"No Info".to_string())),
            other => panic!("unexpected kind {other}"),
        }
    }

    #[test]
    fn test_phrases() {
        assert_eq!(CanonicalParam::Sex.phrase("male"), "male");
        assert_eq!(CanonicalParam::Bmi.phrase("27.5"), "BMI 27.5");
        assert_eq!(CanonicalParam::Hba1c.phrase("6.1"), "HbA1c level 6.1");
        assert_eq!(
            CanonicalParam::Glucose.phrase("140"),
            "blood glucose level 140"
        );
        assert_eq!(CanonicalParam::Hypertension.phrase("yes"), "has hypertension");
        assert_eq!(CanonicalParam::HeartDisease.phrase("0"), "no heart disease");
        assert_eq!(
            CanonicalParam::Hypertension.phrase("borderline"),
            "hypertension borderline"
        );
        assert_eq!(
            CanonicalParam::SmokingHistory.phrase("former"),
            "smoking history former"
        );
    }

    #[test]
    fn test_all_is_in_compilation_order() {
        let mut sorted = CanonicalParam::ALL;
        sorted.sort();
        assert_eq!(sorted, CanonicalParam::ALL);
    }
}
