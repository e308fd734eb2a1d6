use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand, ValueEnum};
use pk_core::sessions::SessionStore;
use pk_core::store::Store;
use pk_core::{PickupError, Pickups, RequestError};
use pk_core::types::{
    CreatePickupInput, PickupId, PickupRequest, ScrapItem, TIME_SLOTS, User, UserId, UserRole,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use crate::error::CliError;

/// Fewest digits accepted in a sign-in phone number.
const MIN_PHONE_DIGITS: usize = 10;

#[derive(Subcommand)]
pub enum Command {
    /// Record who is using this device
    Signin(SigninArgs),
    Signout,
    Whoami,
    /// List bookable time slots
    Slots,
    /// Schedule a new pickup (customers)
    Create(CreateArgs),
    /// List pickups visible to the signed-in user
    List(ListArgs),
    Show(IdArgs),
    /// Claim a pending pickup (partners)
    Accept(IdArgs),
    /// Start a pickup with the customer's code (partners)
    Start(StartArgs),
    /// Submit collected items for approval (partners)
    Submit(SubmitArgs),
    /// Approve submitted items (customers)
    Approve(IdArgs),
    /// Send submitted items back to the partner (customers)
    Reject(IdArgs),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Customer,
    Partner,
}

impl From<RoleArg> for UserRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Customer => UserRole::Customer,
            RoleArg::Partner => UserRole::Partner,
        }
    }
}

#[derive(Args)]
pub struct SigninArgs {
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, value_enum)]
    pub role: RoleArg,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub address: String,
    /// Pickup date, `YYYY-MM-DD` or RFC 3339
    #[arg(long, value_parser = parse_pickup_date)]
    pub date: DateTime<Utc>,
    #[arg(long)]
    pub slot: String,
    #[arg(long)]
    pub map_link: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Partners: only the pending pool open for claiming
    #[arg(long, conflicts_with = "mine")]
    pub pool: bool,
    /// Partners: only pickups assigned to me
    #[arg(long)]
    pub mine: bool,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: PickupId,
}

#[derive(Args)]
pub struct StartArgs {
    pub id: PickupId,
    #[arg(long)]
    pub code: String,
}

#[derive(Args)]
pub struct SubmitArgs {
    pub id: PickupId,
    /// `name:quantity:price`, repeatable
    #[arg(long = "item", required = true, value_parser = parse_item)]
    pub items: Vec<ScrapItem>,
}

pub enum CommandResult {
    User(Option<User>),
    SignedOut,
    Slots(Vec<&'static str>),
    Request { request: PickupRequest, viewer: User },
    Requests { requests: Vec<PickupRequest>, viewer: User },
}

pub fn handle<S: Store>(cmd: Command, pickups: &mut Pickups<S>) -> Result<CommandResult, CliError> {
    match cmd {
        Command::Signin(args) => {
            let phone = normalize_phone(&args.phone)?;
            let id = UserId::new(format!("{}{phone}", UserId::PREFIX)).map_err(|err| {
                CliError::InvalidArgument {
                    message: format!("phone: {err}"),
                }
            })?;
            let user = User {
                id,
                phone,
                name: args.name.trim().to_string(),
                role: args.role.into(),
            };
            pickups.store().sessions().save(&user)?;
            Ok(CommandResult::User(Some(user)))
        }
        Command::Signout => {
            pickups.store().sessions().clear()?;
            Ok(CommandResult::SignedOut)
        }
        Command::Whoami => Ok(CommandResult::User(pickups.store().sessions().load()?)),
        Command::Slots => Ok(CommandResult::Slots(TIME_SLOTS.to_vec())),
        Command::Create(args) => {
            let viewer = require_role(pickups, UserRole::Customer)?;
            let created = pickups.create(CreatePickupInput {
                customer_id: viewer.id.clone(),
                customer_name: viewer.name.clone(),
                customer_phone: viewer.phone.clone(),
                address: args.address,
                google_map_link: args.map_link,
                pickup_date: args.date,
                time_slot: args.slot,
            });
            // A failed save still leaves the new request at the end of the list.
            let request =
                retry_save(pickups, created, |pickups| pickups.all().last().cloned())?;
            Ok(CommandResult::Request { request, viewer })
        }
        Command::List(args) => {
            let viewer = signed_in(pickups)?;
            let requests = match viewer.role {
                UserRole::Customer => pickups.by_customer(&viewer.id),
                UserRole::Partner if args.pool => pickups.by_partner(None),
                UserRole::Partner if args.mine => pickups.by_partner(Some(&viewer.id)),
                UserRole::Partner => pickups.partner_board(&viewer.id),
            };
            let requests = requests.into_iter().cloned().collect();
            Ok(CommandResult::Requests { requests, viewer })
        }
        Command::Show(args) => {
            let viewer = signed_in(pickups)?;
            let request = find(pickups, &args.id)?;
            let visible = match viewer.role {
                UserRole::Customer => request.customer_id == viewer.id,
                UserRole::Partner => {
                    request.partner_id.is_none() || request.is_assigned_to(&viewer.id)
                }
            };
            if !visible {
                return Err(CliError::NotYours);
            }
            Ok(CommandResult::Request { request, viewer })
        }
        Command::Accept(args) => {
            let viewer = require_role(pickups, UserRole::Partner)?;
            let outcome = pickups.accept(&args.id, &viewer);
            let request =
                retry_save(pickups, outcome, |pickups| pickups.get(&args.id).cloned())?;
            Ok(CommandResult::Request { request, viewer })
        }
        Command::Start(args) => {
            let viewer = require_assigned_partner(pickups, &args.id)?;
            let outcome = pickups.start_pickup(&args.id, args.code.trim());
            let request =
                retry_save(pickups, outcome, |pickups| pickups.get(&args.id).cloned())?;
            Ok(CommandResult::Request { request, viewer })
        }
        Command::Submit(args) => {
            let viewer = require_assigned_partner(pickups, &args.id)?;
            let outcome = pickups.submit_items(&args.id, args.items);
            let request =
                retry_save(pickups, outcome, |pickups| pickups.get(&args.id).cloned())?;
            Ok(CommandResult::Request { request, viewer })
        }
        Command::Approve(args) => {
            let viewer = require_owner(pickups, &args.id)?;
            let outcome = pickups.approve(&args.id);
            let request =
                retry_save(pickups, outcome, |pickups| pickups.get(&args.id).cloned())?;
            Ok(CommandResult::Request { request, viewer })
        }
        Command::Reject(args) => {
            let viewer = require_owner(pickups, &args.id)?;
            let outcome = pickups.reject(&args.id);
            let request =
                retry_save(pickups, outcome, |pickups| pickups.get(&args.id).cloned())?;
            Ok(CommandResult::Request { request, viewer })
        }
    }
}

/// Retries a failed save once. When the retry lands, the in-memory record is
/// the command's result.
fn retry_save<S: Store>(
    pickups: &mut Pickups<S>,
    outcome: Result<PickupRequest, PickupError>,
    current: impl FnOnce(&Pickups<S>) -> Option<PickupRequest>,
) -> Result<PickupRequest, CliError> {
    match outcome {
        Err(err) if err.is_recoverable() => {
            pickups.flush()?;
            warn!(error = %err, "first save failed, retry succeeded");
            current(&*pickups).ok_or_else(|| err.into())
        }
        outcome => outcome.map_err(CliError::from),
    }
}

/// Keeps the digits and requires at least [`MIN_PHONE_DIGITS`] of them.
fn normalize_phone(value: &str) -> Result<String, CliError> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let separators_only = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if !separators_only || digits.len() < MIN_PHONE_DIGITS {
        return Err(CliError::InvalidArgument {
            message: format!("phone must have at least {MIN_PHONE_DIGITS} digits, got {value:?}"),
        });
    }
    Ok(digits)
}

fn signed_in<S: Store>(pickups: &Pickups<S>) -> Result<User, CliError> {
    pickups
        .store()
        .sessions()
        .load()?
        .ok_or(CliError::NotSignedIn)
}

fn require_role<S: Store>(pickups: &Pickups<S>, expected: UserRole) -> Result<User, CliError> {
    let user = signed_in(pickups)?;
    if user.role != expected {
        return Err(CliError::WrongRole { expected });
    }
    Ok(user)
}

fn find<S: Store>(pickups: &Pickups<S>, id: &PickupId) -> Result<PickupRequest, CliError> {
    pickups
        .get(id)
        .cloned()
        .ok_or_else(|| PickupError::from(RequestError::NotFound).into())
}

fn require_assigned_partner<S: Store>(
    pickups: &Pickups<S>,
    id: &PickupId,
) -> Result<User, CliError> {
    let user = require_role(pickups, UserRole::Partner)?;
    if !find(pickups, id)?.is_assigned_to(&user.id) {
        return Err(CliError::NotYours);
    }
    Ok(user)
}

fn require_owner<S: Store>(pickups: &Pickups<S>, id: &PickupId) -> Result<User, CliError> {
    let user = require_role(pickups, UserRole::Customer)?;
    if find(pickups, id)?.customer_id != user.id {
        return Err(CliError::NotYours);
    }
    Ok(user)
}

fn parse_pickup_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("invalid date: {value}"));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("expected YYYY-MM-DD or RFC 3339, got {value:?}"))
}

/// Splits from the right so item names may contain `:`.
fn parse_item(value: &str) -> Result<ScrapItem, String> {
    let mut parts = value.rsplitn(3, ':');
    let (Some(price), Some(quantity), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected name:quantity:price, got {value:?}"));
    };
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity {quantity:?}"))?;
    let price = Decimal::from_str(price.trim()).map_err(|_| format!("invalid price {price:?}"))?;
    Ok(ScrapItem::new(name.trim(), quantity, price))
}
