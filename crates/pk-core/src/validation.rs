use crate::error::RequestError;
use crate::types::{CreatePickupInput, PickupStatus, ScrapItem, TIME_SLOTS};
use rust_decimal::Decimal;

pub fn validate_status_transition(
    from: PickupStatus,
    to: PickupStatus,
) -> Result<(), RequestError> {
    use PickupStatus::{Accepted, Completed, InProcess, Pending, PendingApproval};

    let valid = matches!(
        (from, to),
        (Pending, Accepted)
            | (Accepted, InProcess)
            | (InProcess, PendingApproval)
            | (PendingApproval, Completed)
            | (PendingApproval, Accepted)
    );

    if valid {
        Ok(())
    } else {
        Err(RequestError::InvalidTransition { from, to })
    }
}

/// Trims free-text fields in place and rejects drafts missing required data.
pub fn validate_create_input(input: &mut CreatePickupInput) -> Result<(), RequestError> {
    input.address = input.address.trim().to_string();
    if input.address.is_empty() {
        return Err(RequestError::InvalidInput {
            message: "address is required".to_string(),
        });
    }
    if !TIME_SLOTS.contains(&input.time_slot.as_str()) {
        return Err(RequestError::InvalidInput {
            message: format!("unknown time slot: {:?}", input.time_slot),
        });
    }
    input.google_map_link = input
        .google_map_link
        .take()
        .map(|link| link.trim().to_string())
        .filter(|link| !link.is_empty());
    Ok(())
}

pub fn validate_items(items: &[ScrapItem]) -> Result<(), RequestError> {
    if items.is_empty() {
        return Err(RequestError::InvalidInput {
            message: "at least one item is required".to_string(),
        });
    }
    for item in items {
        if item.name.trim().is_empty() {
            return Err(RequestError::InvalidInput {
                message: "item name is required".to_string(),
            });
        }
        if item.quantity == 0 {
            return Err(RequestError::InvalidInput {
                message: format!("quantity for {:?} must be at least 1", item.name),
            });
        }
        if item.price < Decimal::ZERO {
            return Err(RequestError::InvalidInput {
                message: format!("price for {:?} must not be negative", item.name),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn draft() -> CreatePickupInput {
        CreatePickupInput {
            customer_id: UserId::generate(),
            customer_name: "Customer User".to_string(),
            customer_phone: "9876543210".to_string(),
            address: "  12 Market Road ".to_string(),
            google_map_link: Some("   ".to_string()),
            pickup_date: Utc::now(),
            time_slot: "14:00 - 15:00".to_string(),
        }
    }

    #[test]
    fn transition_table_is_exact() {
        let allowed = [
            (PickupStatus::Pending, PickupStatus::Accepted),
            (PickupStatus::Accepted, PickupStatus::InProcess),
            (PickupStatus::InProcess, PickupStatus::PendingApproval),
            (PickupStatus::PendingApproval, PickupStatus::Completed),
            (PickupStatus::PendingApproval, PickupStatus::Accepted),
        ];
        for from in PickupStatus::ALL {
            for to in PickupStatus::ALL {
                let result = validate_status_transition(from, to);
                if allowed.contains(&(from, to)) {
                    assert!(result.is_ok(), "{from} -> {to} should be allowed");
                } else {
                    assert_eq!(
                        result,
                        Err(RequestError::InvalidTransition { from, to }),
                        "{from} -> {to} should be rejected"
                    );
                }
            }
        }
    }

    #[test]
    fn create_input_is_trimmed() {
        let mut input = draft();
        validate_create_input(&mut input).unwrap();
        assert_eq!(input.address, "12 Market Road");
        assert_eq!(input.google_map_link, None);
    }

    #[test]
    fn create_input_requires_address_and_known_slot() {
        let mut input = draft();
        input.address = "   ".to_string();
        assert!(matches!(
            validate_create_input(&mut input),
            Err(RequestError::InvalidInput { .. })
        ));

        let mut input = draft();
        input.time_slot = "13:00 - 14:00".to_string();
        assert!(matches!(
            validate_create_input(&mut input),
            Err(RequestError::InvalidInput { .. })
        ));
    }

    #[test]
    fn items_are_checked() {
        assert!(validate_items(&[]).is_err());
        assert!(validate_items(&[ScrapItem::new("", 1, dec!(1))]).is_err());
        assert!(validate_items(&[ScrapItem::new("Iron", 0, dec!(1))]).is_err());
        assert!(validate_items(&[ScrapItem::new("Iron", 1, dec!(-1))]).is_err());
        assert!(validate_items(&[ScrapItem::new("Glass", 4, dec!(0))]).is_ok());
    }
}
