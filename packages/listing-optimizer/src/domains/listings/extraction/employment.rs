use crate::domains::listings::models::EmploymentType;

const EMPLOYMENT_LABELS: &[(&str, EmploymentType)] = &[
    ("Tam Zamanlı", EmploymentType::FullTime),
    ("Full Time", EmploymentType::FullTime),
    ("Full-time", EmploymentType::FullTime),
    ("Part-time", EmploymentType::PartTime),
    ("Part Time", EmploymentType::PartTime),
    ("Yarı Zamanlı", EmploymentType::PartTime),
    ("Uzaktan", EmploymentType::Remote),
    ("Remote", EmploymentType::Remote),
    ("Freelance", EmploymentType::Contractor),
    ("Sözleşmeli", EmploymentType::Contractor),
    ("Serbest", EmploymentType::Contractor),
    ("Contractor", EmploymentType::Contractor),
    ("Staj", EmploymentType::Intern),
    ("Stajyer", EmploymentType::Intern),
    ("İntörnlük", EmploymentType::Intern),
    ("Intern", EmploymentType::Intern),
    ("Internship", EmploymentType::Intern),
];

/// Map a poster-entered employment label onto [`EmploymentType`].
///
/// Unknown labels fall back to `FullTime`.
pub fn normalize_employment_type(label: &str) -> EmploymentType {
    let needle = label.trim().to_lowercase();

    EMPLOYMENT_LABELS
        .iter()
        .find(|(known, _)| known.to_lowercase() == needle)
        .map(|(_, kind)| *kind)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_turkish_and_english_labels() {
        assert_eq!(normalize_employment_type("Tam Zamanlı"), EmploymentType::FullTime);
        assert_eq!(normalize_employment_type("Yarı Zamanlı"), EmploymentType::PartTime);
        assert_eq!(normalize_employment_type("Part Time"), EmploymentType::PartTime);
        assert_eq!(normalize_employment_type("Uzaktan"), EmploymentType::Remote);
        assert_eq!(normalize_employment_type("Sözleşmeli"), EmploymentType::Contractor);
        assert_eq!(normalize_employment_type("İntörnlük"), EmploymentType::Intern);
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        assert_eq!(normalize_employment_type("  freelance "), EmploymentType::Contractor);
        assert_eq!(normalize_employment_type("STAJ"), EmploymentType::Intern);
    }

    #[test]
    fn unknown_labels_default_to_full_time() {
        assert_eq!(normalize_employment_type("Vardiyalı"), EmploymentType::FullTime);
        assert_eq!(normalize_employment_type(""), EmploymentType::FullTime);
    }
}
