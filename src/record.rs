//! Entity database records, lookup hits, and callbook records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    index::EntityMaskIndex,
    types::{Correlation, DxccId, EntityKind, Sequence, SignFlag, SpotId},
};

/// One prefix record as delivered by a database loader.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRecord {
    /// Full label, e.g. `3B6.3B7`.
    pub label: String,
    /// Record kind.
    pub kind: EntityKind,
    /// Country name.
    pub country: String,
    /// Province or call-area description.
    pub province: String,
    /// City.
    pub city: String,
    /// DXCC entity number.
    pub dxcc: DxccId,
    /// CQ zones.
    pub cq_zones: BTreeSet<u32>,
    /// ITU zones.
    pub itu_zones: BTreeSet<u32>,
    /// Continent code.
    pub continent: String,
    /// Time zone offset text.
    pub time_zone: String,
    /// Latitude text.
    pub latitude: String,
    /// Longitude text.
    pub longitude: String,
    /// WAE entity number, 0 when none.
    pub wae: u32,
    /// WAP entity.
    pub wap: String,
    /// First-level administrative id.
    pub admin1: String,
    /// Second-level administrative id.
    pub admin2: String,
    /// Validity start date.
    pub start_date: String,
    /// Validity end date.
    pub end_date: String,
    /// Free comment.
    pub comment: String,
    /// IOTA flag.
    pub is_iota: bool,
    /// Raw compact mask expressions.
    pub masks: Vec<String>,
}

/// Lookup result for one call sign and one matching entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hit {
    /// Call sign as queried, after cleanup.
    pub call: String,
    /// Kind of the matched record.
    pub kind: EntityKind,
    /// Country name.
    pub country: String,
    /// Province or call-area description.
    pub province: String,
    /// City.
    pub city: String,
    /// County, callbook only.
    pub county: String,
    /// DXCC entity number.
    pub dxcc: DxccId,
    /// CQ zones.
    pub cq_zones: BTreeSet<u32>,
    /// ITU zones.
    pub itu_zones: BTreeSet<u32>,
    /// Continent code.
    pub continent: String,
    /// Time zone offset text.
    pub time_zone: String,
    /// Latitude text.
    pub latitude: String,
    /// Longitude text.
    pub longitude: String,
    /// WAE entity number.
    pub wae: u32,
    /// WAP entity.
    pub wap: String,
    /// First-level administrative id.
    pub admin1: String,
    /// Second-level administrative id.
    pub admin2: String,
    /// Validity start date.
    pub start_date: String,
    /// Validity end date.
    pub end_date: String,
    /// IOTA flag.
    pub is_iota: bool,
    /// Free comment.
    pub comment: String,
    /// Maidenhead grid, callbook only.
    pub grid: String,
    /// LoTW user, callbook only.
    pub lotw: bool,
    /// Flags derived from the call sign modifiers.
    pub flags: BTreeSet<SignFlag>,
    /// Caller spot id.
    pub spot_id: SpotId,
    /// Caller sequence number.
    pub sequence: Sequence,
}

impl Hit {
    /// Builds a hit from a matched entity.
    pub fn from_entity(
        call: &str,
        entity: &EntityMaskIndex,
        flags: &BTreeSet<SignFlag>,
        correlation: Correlation,
    ) -> Self {
        let r = entity.record();
        Self {
            call: call.to_string(),
            kind: r.kind,
            country: r.country.clone(),
            province: r.province.clone(),
            city: r.city.clone(),
            county: String::new(),
            dxcc: r.dxcc,
            cq_zones: r.cq_zones.clone(),
            itu_zones: r.itu_zones.clone(),
            continent: r.continent.clone(),
            time_zone: r.time_zone.clone(),
            latitude: r.latitude.clone(),
            longitude: r.longitude.clone(),
            wae: r.wae,
            wap: r.wap.clone(),
            admin1: r.admin1.clone(),
            admin2: r.admin2.clone(),
            start_date: r.start_date.clone(),
            end_date: r.end_date.clone(),
            is_iota: r.is_iota,
            comment: r.comment.clone(),
            grid: String::new(),
            lotw: false,
            flags: flags.clone(),
            spot_id: correlation.spot_id,
            sequence: correlation.sequence,
        }
    }

    /// Overwrites the correlation fields.
    pub fn correlate(&mut self, correlation: Correlation) {
        self.spot_id = correlation.spot_id;
        self.sequence = correlation.sequence;
    }
}

/// Authoritative record returned by an online callbook.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbookRecord {
    /// Call sign.
    pub call: String,
    /// Country name.
    pub country: String,
    /// DXCC entity number when known.
    pub dxcc: Option<DxccId>,
    /// City line.
    pub addr2: String,
    /// County.
    pub county: String,
    /// State or province.
    pub state: String,
    /// Latitude text.
    pub lat: String,
    /// Longitude text.
    pub lon: String,
    /// Maidenhead grid.
    pub grid: String,
    /// LoTW user.
    pub lotw: bool,
}

impl From<CallbookRecord> for Hit {
    fn from(value: CallbookRecord) -> Self {
        Self {
            call: value.call,
            kind: EntityKind::Dxcc,
            country: value.country,
            province: value.state,
            city: value.addr2,
            county: value.county,
            dxcc: value.dxcc.unwrap_or(0),
            latitude: value.lat,
            longitude: value.lon,
            grid: value.grid,
            lotw: value.lotw,
            ..Self::default()
        }
    }
}
