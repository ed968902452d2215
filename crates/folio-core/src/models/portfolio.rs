use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::record::Record;

/// One portfolio entry as stored in the `portfolios` collection.
///
/// Field names are the camelCase names the public pages read. `title` and
/// `description` mirror `englishTitle` and `koreanDescription` for older pages.
/// Fields this type does not know about are kept in `extra` and written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub english_title: String,
    #[serde(default)]
    pub korean_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub english_description: String,
    #[serde(default)]
    pub korean_description: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accepts `YYYY-MM-DD` and full ISO timestamps, keeping the date part.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", raw, e)))
}

impl PortfolioRecord {
    /// Absent `enabled` is the same as `true`.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn from_record(record: Record) -> Result<Self, serde_json::Error> {
        let mut fields = record.fields;
        fields.insert("id".to_string(), Value::String(record.id));
        serde_json::from_value(Value::Object(fields))
    }

    pub fn to_record(&self) -> Result<Record, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(mut fields) => {
                fields.remove("id");
                Ok(Record::new(self.id.clone(), fields))
            }
            // A struct always serialises to an object
            other => Err(serde::ser::Error::custom(format!(
                "portfolio serialised to a non-object: {}",
                other
            ))),
        }
    }

    /// Every blob URL this record points at, thumbnail first.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.thumbnail.as_str())
            .filter(|url| !url.is_empty())
            .chain(self.images.iter().map(String::as_str))
    }
}

/// The form fields of one add/edit session.
///
/// Every field that some schema variant requires carries a `length(min = 1)`
/// rule; `validation::missing_required_fields` keeps only the ones the
/// configured variant cares about.
#[derive(Debug, Clone, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct PortfolioDraft {
    #[validate(length(min = 1))]
    pub english_title: String,
    pub korean_title: String,
    pub english_description: String,
    #[validate(length(min = 1))]
    pub korean_description: String,
    #[validate(length(min = 1))]
    pub project: String,
    #[validate(length(min = 1))]
    pub client: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub category: String,
    pub subcategory: String,
    pub enabled: Option<bool>,
}

impl PortfolioDraft {
    pub fn from_record(record: &PortfolioRecord) -> Self {
        let english_title = if record.english_title.is_empty() {
            record.title.clone()
        } else {
            record.english_title.clone()
        };
        let korean_description = if record.korean_description.is_empty() {
            record.description.clone()
        } else {
            record.korean_description.clone()
        };

        Self {
            english_title,
            korean_title: record.korean_title.clone(),
            english_description: record.english_description.clone(),
            korean_description,
            project: record.project.clone(),
            client: record.client.clone(),
            date: record.date.clone(),
            category: record.category.clone(),
            subcategory: record.subcategory.clone(),
            enabled: record.enabled,
        }
    }

    /// Build the full record to persist.
    ///
    /// `base` is the record being edited, if any; its unknown fields survive.
    pub fn to_record(
        &self,
        id: String,
        thumbnail: String,
        images: Vec<String>,
        base: Option<&PortfolioRecord>,
        today: NaiveDate,
    ) -> PortfolioRecord {
        PortfolioRecord {
            id,
            title: self.english_title.clone(),
            english_title: self.english_title.clone(),
            korean_title: self.korean_title.clone(),
            description: self.korean_description.clone(),
            english_description: self.english_description.clone(),
            korean_description: self.korean_description.clone(),
            project: self.project.clone(),
            client: self.client.clone(),
            date: self.date.clone(),
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            thumbnail,
            images,
            enabled: self.enabled,
            created_at: base.and_then(|b| b.created_at).or(Some(today)),
            updated_at: Some(today),
            extra: base.map(|b| b.extra.clone()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> Record {
        serde_json::from_value(json!({
            "id": "pumdt_1",
            "title": "PUMDT",
            "englishTitle": "PUMDT",
            "koreanDescription": "brand design",
            "category": "design",
            "thumbnail": "https://cdn/t.jpg",
            "images": ["https://cdn/1.jpg", "https://cdn/2.jpg"],
            "createdAt": "2022-02-01",
            "updatedAt": "2022-02-01",
            "legacyField": {"kept": true}
        }))
        .unwrap()
    }

    #[test]
    fn test_record_round_trip_keeps_unknown_fields() {
        let portfolio = PortfolioRecord::from_record(stored()).unwrap();
        assert_eq!(portfolio.id, "pumdt_1");
        assert_eq!(portfolio.images.len(), 2);
        assert_eq!(portfolio.created_at, NaiveDate::from_ymd_opt(2022, 2, 1));
        assert_eq!(portfolio.extra.get("legacyField"), Some(&json!({"kept": true})));

        let record = portfolio.to_record().unwrap();
        let original = stored();
        assert_eq!(record.id, original.id);
        for field in ["englishTitle", "thumbnail", "images", "createdAt", "legacyField"] {
            assert_eq!(record.get(field), original.get(field), "field {}", field);
        }
        assert!(!record.fields.contains_key("id"));
    }

    #[test]
    fn test_timestamp_dates_keep_the_day() {
        let record: Record = serde_json::from_value(json!({
            "id": "odd",
            "createdAt": "2024-01-02T10:00:00.000Z",
            "updatedAt": null
        }))
        .unwrap();
        let portfolio = PortfolioRecord::from_record(record).unwrap();
        assert_eq!(portfolio.created_at, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(portfolio.updated_at, None);

        let bad: Record =
            serde_json::from_value(json!({"id": "bad", "createdAt": "yesterday"})).unwrap();
        assert!(PortfolioRecord::from_record(bad).is_err());
    }

    #[test]
    fn test_enabled_absent_means_enabled() {
        let portfolio = PortfolioRecord::from_record(stored()).unwrap();
        assert_eq!(portfolio.enabled, None);
        assert!(portfolio.is_enabled());
        assert!(!portfolio.to_record().unwrap().fields.contains_key("enabled"));
    }

    #[test]
    fn test_draft_to_record_keeps_created_at_when_editing() {
        let base = PortfolioRecord::from_record(stored()).unwrap();
        let draft = PortfolioDraft::from_record(&base);
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        let saved = draft.to_record(
            base.id.clone(),
            base.thumbnail.clone(),
            vec!["https://cdn/2.jpg".to_string()],
            Some(&base),
            today,
        );
        assert_eq!(saved.created_at, NaiveDate::from_ymd_opt(2022, 2, 1));
        assert_eq!(saved.updated_at, Some(today));
        assert_eq!(saved.title, "PUMDT");
        assert_eq!(saved.description, "brand design");
        assert!(saved.extra.contains_key("legacyField"));
    }

    #[test]
    fn test_image_urls_skips_empty_thumbnail() {
        let mut portfolio = PortfolioRecord::from_record(stored()).unwrap();
        portfolio.thumbnail.clear();
        let urls: Vec<&str> = portfolio.image_urls().collect();
        assert_eq!(urls, vec!["https://cdn/1.jpg", "https://cdn/2.jpg"]);
    }
}
