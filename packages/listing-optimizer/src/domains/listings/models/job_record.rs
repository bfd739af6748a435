use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::EmploymentType;

/// Company value meaning "no employer known yet".
pub const COMPANY_PLACEHOLDER: &str = "Employer";

/// Salary value meaning "no salary known".
pub const SALARY_UNKNOWN: &str = "0";

/// Status assigned to listings that pass through enrichment.
pub const DEFAULT_STATUS: &str = "active";

/// One job listing as read from and written to the listings file.
///
/// Keys this type does not know about are kept in `extra` and written back
/// untouched, so the output carries everything the input had.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Employment label as typed by the poster ("Tam Zamanlı", "Staj", ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub employment_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(salary.into());
        self
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_employment_label(mut self, label: impl Into<String>) -> Self {
        self.employment_label = Some(label.into());
        self
    }

    pub fn company_is_unset(&self) -> bool {
        match self.company.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(company) => company == COMPANY_PLACEHOLDER,
        }
    }

    pub fn salary_is_unset(&self) -> bool {
        match self.salary.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(salary) => salary == SALARY_UNKNOWN,
        }
    }

    pub fn job_id_is_unset(&self) -> bool {
        self.job_id.as_deref().map_or(true, |id| id.trim().is_empty())
    }

    pub fn status_is_unset(&self) -> bool {
        self.status.as_deref().map_or(true, |s| s.trim().is_empty())
    }

    /// Snapshot of the fields sent to the rewrite service.
    pub fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
        }
    }
}

/// Immutable input to one rewrite call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
}

/// Some exports write `null` for blank text fields.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Older exports store salary as a bare number.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "salary must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = r#"{
            "title": "Kurye",
            "description": "Paket dağıtımı",
            "contactPhone": "0555 000 00 00",
            "isPremium": true
        }"#;

        let record: JobRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.extra["contactPhone"], "0555 000 00 00");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["isPremium"], true);
        assert!(json.get("jobId").is_none());
    }

    #[test]
    fn null_text_fields_read_as_empty() {
        let record: JobRecord =
            serde_json::from_str(r#"{"title":null,"description":null,"location":"İzmir"}"#)
                .unwrap();

        assert_eq!(record.title, "");
        assert_eq!(record.description, "");
        assert_eq!(record.location.as_deref(), Some("İzmir"));
    }

    #[test]
    fn numeric_salary_is_read_as_string() {
        let record: JobRecord =
            serde_json::from_str(r#"{"title":"a","description":"b","salary":0}"#).unwrap();
        assert_eq!(record.salary.as_deref(), Some("0"));
        assert!(record.salary_is_unset());
    }

    #[test]
    fn camel_case_fields_map() {
        let record: JobRecord = serde_json::from_str(
            r#"{"title":"a","description":"b","jobId":"-1","createdAt":1700000000000,"type":"Staj"}"#,
        )
        .unwrap();

        assert_eq!(record.job_id.as_deref(), Some("-1"));
        assert_eq!(record.created_at, Some(1_700_000_000_000));
        assert_eq!(record.employment_label.as_deref(), Some("Staj"));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn placeholder_company_counts_as_unset() {
        assert!(JobRecord::new("a", "b").company_is_unset());
        assert!(JobRecord::new("a", "b").with_company("  ").company_is_unset());
        assert!(JobRecord::new("a", "b")
            .with_company(COMPANY_PLACEHOLDER)
            .company_is_unset());
        assert!(!JobRecord::new("a", "b")
            .with_company("Yurtiçi Kargo")
            .company_is_unset());
    }

    #[test]
    fn generation_request_defaults_missing_fields() {
        let request = JobRecord::new("Garson", "Servis elemanı aranıyor")
            .with_location("İzmir")
            .generation_request();

        assert_eq!(request.location, "İzmir");
        assert_eq!(request.category, "");
    }
}
