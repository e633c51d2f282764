//! PrefixList XML reader.

use std::collections::BTreeSet;

use quick_xml::{events::Event, Reader};

use crate::{record::EntityRecord, types::EntityKind};

use super::{LoadError, LoadResult};

const RECORD_TAG: &[u8] = b"prefix";

fn field_error(field: &str, value: &str) -> LoadError {
    LoadError::Field {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn parse_number(field: &str, value: &str) -> LoadResult<u32> {
    value.parse().map_err(|_| field_error(field, value))
}

fn parse_zones(field: &str, value: &str) -> LoadResult<BTreeSet<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .map(|z| parse_number(field, z))
        .collect()
}

fn apply_field(record: &mut EntityRecord, tag: &str, value: &str) -> LoadResult<()> {
    match tag {
        "mask" => record.masks.push(value.to_string()),
        "label" => record.label = value.to_string(),
        "kind" => {
            record.kind = EntityKind::from_code(value).ok_or_else(|| field_error(tag, value))?;
        }
        "country" => record.country = value.to_string(),
        "province" => record.province = value.to_string(),
        "city" => record.city = value.to_string(),
        "dxcc_entity" => record.dxcc = parse_number(tag, value)?,
        "cq_zone" => record.cq_zones = parse_zones(tag, value)?,
        "itu_zone" => record.itu_zones = parse_zones(tag, value)?,
        "continent" => record.continent = value.to_string(),
        "time_zone" => record.time_zone = value.to_string(),
        "lat" => record.latitude = value.to_string(),
        "long" => record.longitude = value.to_string(),
        "wae_entity" => record.wae = parse_number(tag, value)?,
        "wap_entity" => record.wap = value.to_string(),
        "province_id" => record.admin1 = value.to_string(),
        "admin2" => record.admin2 = value.to_string(),
        "start_date" => record.start_date = value.to_string(),
        "end_date" => record.end_date = value.to_string(),
        "comment" => record.comment = value.to_string(),
        "iota" => record.is_iota = matches!(value, "1" | "true" | "TRUE" | "True"),
        _ => {}
    }
    Ok(())
}

/// Reads every `<prefix>` record of a PrefixList document.
///
/// Unknown elements are skipped; a bad number, zone list or kind fails.
pub fn parse_prefix_xml(xml: &str) -> LoadResult<Vec<EntityRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut current: Option<EntityRecord> = None;
    let mut tag = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                if name.as_ref() == RECORD_TAG {
                    current = Some(EntityRecord::default());
                }
                tag = String::from_utf8_lossy(name.as_ref()).into_owned();
            }
            Event::Text(text) => {
                if let Some(record) = current.as_mut() {
                    let value = text.unescape().map_err(|e| LoadError::Xml(e.into()))?;
                    let value = value.trim();
                    if !value.is_empty() {
                        apply_field(record, &tag, value)?;
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == RECORD_TAG {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
                tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if current.is_some() {
        return Err(LoadError::Truncated);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<prefixdata>
  <prefix>
    <masks>
      <mask>KG4@@.</mask>
    </masks>
    <label>KG4</label>
    <kind>pfDXCC</kind>
    <country>Guantanamo Bay</country>
    <province />
    <dxcc_entity>105</dxcc_entity>
    <cq_zone>8</cq_zone>
    <itu_zone>11</itu_zone>
    <continent>NA</continent>
    <time_zone>-5</time_zone>
    <lat>19.9</lat>
    <long>-75.1</long>
  </prefix>
  <prefix>
    <masks><mask>[KNW]4</mask><mask>[KNW]4/</mask></masks>
    <label>W4</label>
    <kind>pfProvince</kind>
    <country>United States</country>
    <province>AL;FL;GA</province>
    <dxcc_entity>291</dxcc_entity>
    <cq_zone>4, 5</cq_zone>
    <itu_zone>7,8</itu_zone>
    <province_id>AL</province_id>
  </prefix>
</prefixdata>"#;

    #[test]
    fn reads_records_in_document_order() {
        let records = parse_prefix_xml(SAMPLE).expect("parse");
        assert_eq!(records.len(), 2);
        let kg4 = &records[0];
        assert_eq!(kg4.label, "KG4");
        assert_eq!(kg4.kind, EntityKind::Dxcc);
        assert_eq!(kg4.dxcc, 105);
        assert_eq!(kg4.masks, vec!["KG4@@.".to_string()]);
        assert_eq!(kg4.longitude, "-75.1");
        let w4 = &records[1];
        assert_eq!(w4.masks.len(), 2);
        assert_eq!(w4.cq_zones, BTreeSet::from([4, 5]));
        assert_eq!(w4.itu_zones, BTreeSet::from([7, 8]));
        assert_eq!(w4.admin1, "AL");
    }

    #[test]
    fn bad_fields_are_reported() {
        let xml = "<prefixdata><prefix><dxcc_entity>abc</dxcc_entity></prefix></prefixdata>";
        assert!(matches!(
            parse_prefix_xml(xml),
            Err(LoadError::Field { ref field, .. }) if field == "dxcc_entity"
        ));
        let xml = "<prefixdata><prefix><kind>pfBogus</kind></prefix></prefixdata>";
        assert!(matches!(parse_prefix_xml(xml), Err(LoadError::Field { .. })));
    }
}
