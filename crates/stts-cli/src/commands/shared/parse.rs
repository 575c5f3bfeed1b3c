use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use stts_db::updates::crop::StageTemplate;
use stts_db::updates::permit::PermitItemInput;

const DEFAULT_UNIT: &str = "kg";

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_opt_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

/// Parse a JSON document given on the command line.
pub fn parse_json(raw: &str, field: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|error| anyhow::anyhow!("invalid {field} JSON: {error}"))
}

pub fn parse_opt_json(raw: Option<&str>, field: &str) -> anyhow::Result<Option<serde_json::Value>> {
    raw.map(|value| parse_json(value, field)).transpose()
}

/// Accept `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow::anyhow!("invalid {field} '{raw}': expected YYYY-MM-DD or RFC 3339"))
}

pub fn parse_opt_date(raw: Option<&str>, field: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
    raw.map(|value| parse_date(value, field)).transpose()
}

/// `VARIETY_ID:QUANTITY[:UNIT]`, unit defaulting to kg.
pub fn parse_permit_item(raw: &str) -> anyhow::Result<PermitItemInput> {
    let mut parts = raw.splitn(3, ':');
    let variety = parts.next().map(str::trim).unwrap_or_default();
    let quantity = parts.next().map(str::trim);
    let unit = parts.next().map(str::trim).filter(|u| !u.is_empty());

    let (false, Some(quantity)) = (variety.is_empty(), quantity) else {
        anyhow::bail!("invalid item '{raw}': expected VARIETY_ID:QUANTITY[:UNIT]");
    };
    let quantity: f64 = quantity
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid item '{raw}': quantity '{quantity}' is not a number"))?;

    Ok(PermitItemInput {
        crop_variety_id: variety.to_string(),
        quantity,
        unit: unit.unwrap_or(DEFAULT_UNIT).to_string(),
    })
}

/// `NAME[:DAYS_AFTER_PLANTING]`.
pub fn parse_stage(raw: &str) -> anyhow::Result<StageTemplate> {
    let (name, days) = match raw.rsplit_once(':') {
        Some((name, days)) => {
            let days = days
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("invalid stage '{raw}': days must be a whole number"))?;
            (name.trim(), Some(days))
        }
        None => (raw.trim(), None),
    };
    if name.is_empty() {
        anyhow::bail!("invalid stage '{raw}': name is empty");
    }
    Ok(StageTemplate {
        name: name.to_string(),
        period_after_planting_days: days,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;
    use stts_core::enums::{Decision, SeedClass};

    use super::*;

    #[test]
    fn parses_snake_case_enum() {
        let decision: Decision = parse_enum("approved", "decision").expect("decision should parse");
        assert_eq!(decision, Decision::Approved);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let class: SeedClass = parse_enum("pre-basic", "seed class").expect("class should parse");
        assert_eq!(class, SeedClass::PreBasic);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Decision>("maybe", "decision").expect_err("should fail");
        assert!(err.to_string().contains("invalid decision 'maybe'"));
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        let date = parse_date("2024-03-05", "date").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn rfc3339_is_normalized_to_utc() {
        let date = parse_date("2024-03-05T23:30:00-02:00", "date").unwrap();
        assert_eq!((date.day(), date.hour()), (6, 1));
    }

    #[test]
    fn bad_date_names_the_field() {
        let err = parse_date("05/03/2024", "date planted").unwrap_err();
        assert!(err.to_string().contains("date planted"));
    }

    #[test]
    fn permit_item_defaults_unit() {
        let item = parse_permit_item("var-1:250").unwrap();
        assert_eq!(
            item,
            PermitItemInput {
                crop_variety_id: "var-1".into(),
                quantity: 250.0,
                unit: "kg".into(),
            }
        );
        assert_eq!(parse_permit_item("var-1:3:bags").unwrap().unit, "bags");
    }

    #[test]
    fn permit_item_rejects_missing_quantity() {
        assert!(parse_permit_item("var-1").is_err());
        assert!(parse_permit_item(":10").is_err());
        assert!(parse_permit_item("var-1:lots").is_err());
    }

    #[test]
    fn stage_with_and_without_days() {
        assert_eq!(
            parse_stage("Flowering:45").unwrap(),
            StageTemplate {
                name: "Flowering".into(),
                period_after_planting_days: Some(45),
            }
        );
        assert_eq!(parse_stage("Pre-harvest").unwrap().period_after_planting_days, None);
        assert!(parse_stage("Flowering:soon").is_err());
        assert!(parse_stage(":10").is_err());
    }
}
