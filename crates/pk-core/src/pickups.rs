use crate::error::{PickupError, RequestError};
use crate::requests::RequestStore;
use crate::store::Store;
use crate::types::{
    CreatePickupInput, PartnerRef, PickupCode, PickupId, PickupRequest, PickupStatus, ScrapItem,
    User, UserId, total_amount,
};
use crate::validation::{validate_create_input, validate_items, validate_status_transition};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Empty,
    /// Stored data was unreadable; the repository started empty instead.
    Recovered { reason: String },
}

/// Owns the pickup request collection for the running process and keeps the
/// store in sync after every mutation.
///
/// Every mutation is applied to a copy of the record first. Rejected requests
/// leave the collection untouched; accepted ones replace the record and then
/// save the whole collection. A failed save keeps the in-memory change, marks
/// the repository dirty and returns [`PickupError::Persistence`].
pub struct Pickups<S: Store> {
    store: S,
    requests: Vec<PickupRequest>,
    dirty: bool,
}

impl<S: Store> Pickups<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            requests: Vec::new(),
            dirty: false,
        }
    }

    pub fn open(store: S) -> (Self, LoadOutcome) {
        let mut pickups = Self::new(store);
        let outcome = pickups.load();
        (pickups, outcome)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&mut self) -> LoadOutcome {
        self.dirty = false;
        match self.store.requests().load() {
            Ok(Some(mut requests)) => {
                let stored = requests.len();
                let mut seen = HashSet::new();
                requests.retain(|request| seen.insert(request.id.clone()));
                let count = requests.len();
                if count < stored {
                    // Only the first copy is reachable by id.
                    warn!(dropped = stored - count, "duplicate pickup ids in storage");
                    self.dirty = true;
                }
                self.requests = requests;
                debug!(count, "loaded pickup requests");
                LoadOutcome::Loaded(count)
            }
            Ok(None) => {
                self.requests.clear();
                LoadOutcome::Empty
            }
            Err(err) => {
                warn!(error = %err, "pickup requests unreadable, starting empty");
                self.requests.clear();
                LoadOutcome::Recovered {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// True when memory is ahead of storage: the last save failed, or a load
    /// dropped duplicate ids.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn flush(&mut self) -> Result<(), PickupError> {
        if !self.dirty {
            return Ok(());
        }
        self.persist()
    }

    pub fn create(&mut self, mut input: CreatePickupInput) -> Result<PickupRequest, PickupError> {
        validate_create_input(&mut input)?;
        let mut id = PickupId::generate();
        while self.position(&id).is_some() {
            id = PickupId::generate();
        }
        let now = Utc::now();
        let request = PickupRequest {
            id,
            customer_id: input.customer_id,
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            address: input.address,
            google_map_link: input.google_map_link,
            pickup_date: input.pickup_date,
            time_slot: input.time_slot,
            status: PickupStatus::Pending,
            pickup_code: None,
            partner_id: None,
            partner_name: None,
            items: None,
            total_amount: None,
            created_at: now,
            updated_at: now,
        };
        debug!(id = %request.id, customer = %request.customer_id, "pickup request created");
        self.requests.push(request.clone());
        self.persist()?;
        Ok(request)
    }

    /// Moves a request along the transition table.
    ///
    /// `pending -> accepted` needs the claiming partner, `accepted -> in-process`
    /// is only reachable through [`Pickups::start_pickup`], and
    /// `in-process -> pending-approval` needs items attached first.
    pub fn transition(
        &mut self,
        id: &PickupId,
        to: PickupStatus,
        partner: Option<PartnerRef>,
    ) -> Result<PickupRequest, PickupError> {
        self.mutate(id, |request| {
            validate_status_transition(request.status, to)?;
            match (request.status, to) {
                (PickupStatus::Pending, PickupStatus::Accepted) => {
                    let Some(partner) = partner else {
                        return Err(RequestError::InvalidInput {
                            message: "a partner is required to accept a pickup".to_string(),
                        });
                    };
                    assign_partner(request, partner);
                }
                (PickupStatus::Accepted, PickupStatus::InProcess) => {
                    return Err(RequestError::CodeRequired);
                }
                (PickupStatus::InProcess, PickupStatus::PendingApproval)
                    if request.items.is_none() =>
                {
                    return Err(RequestError::InvalidState {
                        message: "items must be attached before requesting approval".to_string(),
                    });
                }
                _ => {
                    if let Some(partner) = partner {
                        if !request.is_assigned_to(&partner.id) {
                            return Err(RequestError::InvalidInput {
                                message: "partner can only change when a pickup is accepted"
                                    .to_string(),
                            });
                        }
                    }
                }
            }
            request.status = to;
            Ok(())
        })
    }

    pub fn attach_code(
        &mut self,
        id: &PickupId,
        code: PickupCode,
    ) -> Result<PickupRequest, PickupError> {
        self.mutate(id, |request| {
            match &request.pickup_code {
                Some(existing) if *existing == code => return Ok(()),
                Some(_) => return Err(RequestError::CodeAlreadySet),
                None => {}
            }
            if request.status != PickupStatus::Accepted {
                return Err(RequestError::InvalidState {
                    message: format!("cannot attach a code while {}", request.status),
                });
            }
            request.pickup_code = Some(code);
            Ok(())
        })
    }

    /// Records the collected items. `total_amount` must be the exact sum of
    /// quantity times price.
    pub fn attach_items(
        &mut self,
        id: &PickupId,
        items: Vec<ScrapItem>,
        total_amount: Decimal,
    ) -> Result<PickupRequest, PickupError> {
        self.mutate(id, |request| {
            if request.status != PickupStatus::InProcess {
                return Err(RequestError::InvalidState {
                    message: format!("cannot attach items while {}", request.status),
                });
            }
            set_items(request, items, Some(total_amount))
        })
    }

    /// Partner claims a pending request; a pickup code is generated for it.
    pub fn accept(&mut self, id: &PickupId, partner: &User) -> Result<PickupRequest, PickupError> {
        let Some(partner) = partner.as_partner() else {
            return Err(RequestError::InvalidInput {
                message: "only partners can accept pickups".to_string(),
            }
            .into());
        };
        self.mutate(id, |request| {
            validate_status_transition(request.status, PickupStatus::Accepted)?;
            if request.status != PickupStatus::Pending {
                return Err(RequestError::InvalidTransition {
                    from: request.status,
                    to: PickupStatus::Accepted,
                });
            }
            assign_partner(request, partner);
            if request.pickup_code.is_none() {
                request.pickup_code = Some(PickupCode::generate(&mut rand::thread_rng()));
            }
            request.status = PickupStatus::Accepted;
            Ok(())
        })
    }

    /// Partner starts the physical pickup with the code the customer read out.
    pub fn start_pickup(&mut self, id: &PickupId, code: &str) -> Result<PickupRequest, PickupError> {
        self.mutate(id, |request| {
            validate_status_transition(request.status, PickupStatus::InProcess)?;
            let Some(stored) = &request.pickup_code else {
                return Err(RequestError::InvalidState {
                    message: "pickup has no code".to_string(),
                });
            };
            if !stored.matches(code) {
                return Err(RequestError::CodeMismatch);
            }
            request.status = PickupStatus::InProcess;
            Ok(())
        })
    }

    /// Attaches the itemised list with its computed total and asks the
    /// customer for approval.
    pub fn submit_items(
        &mut self,
        id: &PickupId,
        items: Vec<ScrapItem>,
    ) -> Result<PickupRequest, PickupError> {
        self.mutate(id, |request| {
            validate_status_transition(request.status, PickupStatus::PendingApproval)?;
            set_items(request, items, None)?;
            request.status = PickupStatus::PendingApproval;
            Ok(())
        })
    }

    pub fn approve(&mut self, id: &PickupId) -> Result<PickupRequest, PickupError> {
        self.review(id, PickupStatus::Completed)
    }

    /// Sends the pickup back to the partner. Submitted items stay attached.
    pub fn reject(&mut self, id: &PickupId) -> Result<PickupRequest, PickupError> {
        self.review(id, PickupStatus::Accepted)
    }

    pub fn get(&self, id: &PickupId) -> Option<&PickupRequest> {
        self.requests.iter().find(|request| &request.id == id)
    }

    pub fn all(&self) -> &[PickupRequest] {
        &self.requests
    }

    pub fn by_customer(&self, customer_id: &UserId) -> Vec<&PickupRequest> {
        self.requests
            .iter()
            .filter(|request| &request.customer_id == customer_id)
            .collect()
    }

    /// With a partner, the requests assigned to them; without one, the
    /// pending pool open for claiming.
    pub fn by_partner(&self, partner_id: Option<&UserId>) -> Vec<&PickupRequest> {
        match partner_id {
            Some(partner_id) => self
                .requests
                .iter()
                .filter(|request| request.is_assigned_to(partner_id))
                .collect(),
            None => self
                .requests
                .iter()
                .filter(|request| request.status == PickupStatus::Pending)
                .collect(),
        }
    }

    /// Pending pool plus everything assigned to the partner.
    pub fn partner_board(&self, partner_id: &UserId) -> Vec<&PickupRequest> {
        self.requests
            .iter()
            .filter(|request| {
                request.status == PickupStatus::Pending || request.is_assigned_to(partner_id)
            })
            .collect()
    }

    fn review(&mut self, id: &PickupId, to: PickupStatus) -> Result<PickupRequest, PickupError> {
        self.mutate(id, |request| {
            if request.status != PickupStatus::PendingApproval {
                return Err(RequestError::InvalidTransition {
                    from: request.status,
                    to,
                });
            }
            validate_status_transition(request.status, to)?;
            request.status = to;
            Ok(())
        })
    }

    fn position(&self, id: &PickupId) -> Option<usize> {
        self.requests.iter().position(|request| &request.id == id)
    }

    fn mutate<F>(&mut self, id: &PickupId, f: F) -> Result<PickupRequest, PickupError>
    where
        F: FnOnce(&mut PickupRequest) -> Result<(), RequestError>,
    {
        let index = self.position(id).ok_or(RequestError::NotFound)?;
        let mut updated = self.requests[index].clone();
        f(&mut updated)?;
        updated.updated_at = Utc::now().max(updated.created_at);
        debug!(id = %updated.id, status = %updated.status, "pickup request updated");
        self.requests[index] = updated.clone();
        self.persist()?;
        Ok(updated)
    }

    fn persist(&mut self) -> Result<(), PickupError> {
        match self.store.requests().save(&self.requests) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to save pickup requests");
                self.dirty = true;
                Err(err.into())
            }
        }
    }
}

fn assign_partner(request: &mut PickupRequest, partner: PartnerRef) {
    request.partner_id = Some(partner.id);
    request.partner_name = Some(partner.name);
}

fn set_items(
    request: &mut PickupRequest,
    items: Vec<ScrapItem>,
    claimed_total: Option<Decimal>,
) -> Result<(), RequestError> {
    validate_items(&items)?;
    let total = total_amount(&items).ok_or_else(|| RequestError::InvalidInput {
        message: "item total is too large".to_string(),
    })?;
    if let Some(claimed) = claimed_total {
        if claimed != total {
            return Err(RequestError::InvalidInput {
                message: format!("total amount {claimed} does not match item total {total}"),
            });
        }
    }
    request.items = Some(items);
    request.total_amount = Some(total);
    Ok(())
}
