use crate::kv::{KvTable, PICKUP_REQUESTS_KEY};
use crate::util::{decode_json, encode_json};
use pk_core::StorageError;
use pk_core::requests::RequestStore;
use pk_core::types::PickupRequest;
use rusqlite::Connection;
use tracing::debug;

/// The whole collection lives in one JSON array under `pickup_requests`.
pub struct RequestRepo<'a> {
    kv: KvTable<'a>,
}

impl<'a> RequestRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            kv: KvTable::new(conn),
        }
    }
}

impl RequestStore for RequestRepo<'_> {
    fn load(&self) -> Result<Option<Vec<PickupRequest>>, StorageError> {
        let Some(raw) = self
            .kv
            .get(PICKUP_REQUESTS_KEY)
            .map_err(|err| err.into_read())?
        else {
            return Ok(None);
        };
        let requests: Vec<PickupRequest> = decode_json(&raw).map_err(|err| err.into_read())?;
        Ok(Some(requests))
    }

    fn save(&self, requests: &[PickupRequest]) -> Result<(), StorageError> {
        let raw = encode_json(requests).map_err(|err| err.into_write())?;
        self.kv
            .set(PICKUP_REQUESTS_KEY, &raw)
            .map_err(|err| err.into_write())?;
        debug!(count = requests.len(), bytes = raw.len(), "saved pickup requests");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::with_test_db;
    use chrono::{TimeZone, Utc};
    use pk_core::types::{PickupStatus, ScrapItem};
    use rust_decimal_macros::dec;

    fn request(id: &str, status: PickupStatus) -> PickupRequest {
        let created = Utc.with_ymd_and_hms(2026, 10, 18, 8, 30, 0).unwrap();
        PickupRequest {
            id: id.parse().unwrap(),
            customer_id: "c1".parse().unwrap(),
            customer_name: "Customer User".to_string(),
            customer_phone: "9876543210".to_string(),
            address: "12 Market Road".to_string(),
            google_map_link: Some("https://maps.example/abc".to_string()),
            pickup_date: Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap(),
            time_slot: "09:00 - 10:00".to_string(),
            status,
            pickup_code: Some("482913".parse().unwrap()),
            partner_id: Some("p1".parse().unwrap()),
            partner_name: Some("Partner User".to_string()),
            items: Some(vec![
                ScrapItem::new("Newspaper", 2, dec!(10)),
                ScrapItem::new("Cardboard", 3, dec!(0.1)),
            ]),
            total_amount: Some(dec!(20.3)),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn missing_key_loads_as_none() {
        let conn = with_test_db().unwrap();
        assert!(RequestRepo::new(&conn).load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_is_deep_equal() {
        let conn = with_test_db().unwrap();
        let repo = RequestRepo::new(&conn);
        let requests = vec![
            request("pk_a", PickupStatus::PendingApproval),
            request("1718000000000", PickupStatus::Completed),
        ];
        repo.save(&requests).unwrap();
        assert_eq!(repo.load().unwrap(), Some(requests));

        repo.save(&[]).unwrap();
        assert_eq!(repo.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn stored_document_is_a_camel_case_array() {
        let conn = with_test_db().unwrap();
        RequestRepo::new(&conn)
            .save(&[request("pk_a", PickupStatus::InProcess)])
            .unwrap();
        let raw = KvTable::new(&conn).get(PICKUP_REQUESTS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["status"], "in-process");
        assert_eq!(value[0]["pickupCode"], "482913");
        assert!(value[0]["totalAmount"].is_number());
    }

    #[test]
    fn corrupt_document_is_a_decode_error() {
        let conn = with_test_db().unwrap();
        KvTable::new(&conn)
            .set(PICKUP_REQUESTS_KEY, "[{\"id\": 42}")
            .unwrap();
        let err = RequestRepo::new(&conn).load().unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));
    }
}
