//! Cart reservation policy: variant keys, staleness, and the set-quantity
//! reconciliation rules.
//!
//! In-cart quantities are soft reservations against product stock. A cart
//! line is keyed by (user, product, size variant); the empty string is the
//! "no size / default variant" key. These functions are pure so the
//! merge/re-key decision matrix can be tested without a database.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// How long a cart line holds its reservation before it is considered stale.
pub const CART_LINE_TTL_HOURS: i64 = 2;

/// Storage key for "no size selected".
pub const DEFAULT_VARIANT: &str = "";

/* --------------------------------------------------------------------------
Staleness
-------------------------------------------------------------------------- */

/// The cutoff timestamp for live cart lines: anything with `added_at`
/// strictly before this is stale and must not be read or counted.
pub fn staleness_cutoff(now: Timestamp) -> Timestamp {
    now - Duration::hours(CART_LINE_TTL_HOURS)
}

/// Whether a line with the given `added_at` is stale at `now`.
pub fn is_stale(added_at: Timestamp, now: Timestamp) -> bool {
    added_at < staleness_cutoff(now)
}

/* --------------------------------------------------------------------------
Variant keys
-------------------------------------------------------------------------- */

/// Map an optional request variant to its storage key.
///
/// Rows always store a concrete string; an omitted variant reserves the
/// default-variant key. Note that "omitted" and "given as empty string"
/// reach the same storage key here -- operations that treat the two
/// differently (Remove) must branch on the `Option` before calling this.
pub fn storage_variant(variant: Option<&str>) -> &str {
    variant.unwrap_or(DEFAULT_VARIANT)
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Validate a Reserve quantity delta (must add at least one unit).
pub fn validate_quantity_delta(quantity: i32) -> Result<(), CoreError> {
    if quantity >= 1 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Quantity must be at least 1, got {quantity}"
        )))
    }
}

/// Validate an absolute SetQuantity value (zero means delete).
pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity >= 0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Quantity must not be negative, got {quantity}"
        )))
    }
}

/* --------------------------------------------------------------------------
Set-quantity reconciliation
-------------------------------------------------------------------------- */

/// What to do with a resolved cart line when setting a positive quantity.
///
/// The uniqueness constraint on (user, product, variant) means a variant
/// switch must either land on an existing row for the target variant or
/// move the found row to the new key; never both rows at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetQuantityPlan {
    /// Same variant (or none requested): update the found line's quantity
    /// and refresh its timestamp.
    UpdateInPlace,
    /// A line already exists at the target variant key: overwrite its
    /// quantity and delete the found line. The found line's quantity is
    /// discarded, not summed.
    MergeInto,
    /// No line at the target key: re-key the found line to the new variant
    /// in place.
    Rekey,
}

/// Decide how a positive SetQuantity lands, given the variant the caller
/// requested, the variant stored on the line the lookup resolved to, and
/// whether a separate line already sits at the requested key.
pub fn plan_set_quantity(
    requested: Option<&str>,
    found_variant: &str,
    target_exists: bool,
) -> SetQuantityPlan {
    match requested {
        None => SetQuantityPlan::UpdateInPlace,
        Some(v) if v == found_variant => SetQuantityPlan::UpdateInPlace,
        Some(_) if target_exists => SetQuantityPlan::MergeInto,
        Some(_) => SetQuantityPlan::Rekey,
    }
}
