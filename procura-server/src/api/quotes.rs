//! Quote submission with server-computed totals

use axum::{
    Extension,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{RfqStatus, Role};
use shared::util::{format_amount, now_millis};

use crate::auth::AuthUser;
use crate::db::quotes::NewQuoteItem;
use crate::db::{quotes, rfqs};
use crate::state::AppState;

use super::{Actor, ApiResult, CreatedResult, created, internal, load_actor, ok};

#[derive(Deserialize)]
pub struct QuoteLineInput {
    pub rfq_item_id: i64,
    /// Decimal string, e.g. "12.50"
    pub unit_price: String,
}

#[derive(Deserialize)]
pub struct CreateQuoteRequest {
    pub items: Vec<QuoteLineInput>,
    pub validity_until: Option<i64>,
    /// Defaults to the RFQ's currency
    pub currency: Option<String>,
}

#[derive(Serialize)]
pub struct QuotePayload {
    pub quote: quotes::Quote,
    pub items: Vec<quotes::QuoteItem>,
}

#[derive(Serialize)]
pub struct QuotesPayload {
    pub quotes: Vec<quotes::Quote>,
}

/// A quote with its line items, as embedded in RFQ detail responses.
#[derive(Serialize)]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: quotes::Quote,
    pub items: Vec<quotes::QuoteItem>,
}

/// POST /api/rfqs/{id}/quotes (supplier only)
///
/// Line subtotals and the quote total are computed server-side from the
/// stored RFQ item quantities; client-sent totals are never trusted.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(rfq_id): Path<i64>,
    axum::Json(req): axum::Json<CreateQuoteRequest>,
) -> CreatedResult<QuotePayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let supplier_id = actor.require_supplier_profile()?;

    let rfq = rfqs::find_by_id(&state.pool, rfq_id)
        .await
        .map_err(internal)?
        .filter(|r| r.status != RfqStatus::Draft.as_str())
        .ok_or_else(|| AppError::new(ErrorCode::RfqNotFound))?;

    if let Some(validity_until) = req.validity_until
        && validity_until <= now_millis()
    {
        return Err(AppError::new(ErrorCode::QuoteValidityInvalid));
    }

    let currency = match req.currency.as_deref().map(str::trim) {
        Some("") => return Err(AppError::validation("currency must not be empty")),
        Some(other) => other,
        None => rfq.currency.as_str(),
    };

    let rfq_items = rfqs::list_items(&state.pool, rfq.id)
        .await
        .map_err(internal)?;
    let (lines, total) = compute_quote_lines(&rfq_items, &req.items)?;

    let quote_id = quotes::create_with_items(
        &state.pool,
        rfq.id,
        supplier_id,
        currency,
        &format_amount(total),
        req.validity_until,
        &lines,
        now_millis(),
    )
    .await
    .map_err(internal)?;

    load_detail(&state, quote_id).await.and_then(created)
}

/// GET /api/rfqs/{id}/quotes
///
/// The owning buyer (and admins) see every quote on the RFQ; a supplier
/// sees only their own.
pub async fn list_for_rfq(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(rfq_id): Path<i64>,
) -> ApiResult<QuotesPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let rfq = rfqs::find_by_id(&state.pool, rfq_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RfqNotFound))?;

    let quotes = match actor.role {
        Role::Admin => quotes::list_for_rfq(&state.pool, rfq.id).await.map_err(internal)?,
        Role::Buyer => {
            if rfq.buyer_id != actor.user_id {
                return Err(AppError::forbidden("not your RFQ"));
            }
            quotes::list_for_rfq(&state.pool, rfq.id).await.map_err(internal)?
        }
        Role::Supplier => {
            let supplier_id = actor.require_supplier_profile()?;
            quotes::list_for_rfq(&state.pool, rfq.id)
                .await
                .map_err(internal)?
                .into_iter()
                .filter(|q| q.supplier_id == supplier_id)
                .collect()
        }
    };
    ok(QuotesPayload { quotes })
}

/// GET /api/quotes (supplier's own quotes)
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<QuotesPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let supplier_id = actor.require_supplier_profile()?;
    let quotes = quotes::list_for_supplier(&state.pool, supplier_id)
        .await
        .map_err(internal)?;
    ok(QuotesPayload { quotes })
}

/// GET /api/quotes/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<QuotePayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let quote = find_visible(&state, &actor, id).await?;
    let items = quotes::list_items(&state.pool, quote.id)
        .await
        .map_err(internal)?;
    ok(QuotePayload { quote, items })
}

// ── Helpers ──

async fn load_detail(state: &AppState, id: i64) -> Result<QuotePayload, AppError> {
    let quote = quotes::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::QuoteNotFound))?;
    let items = quotes::list_items(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(QuotePayload { quote, items })
}

pub(crate) async fn find_visible(
    state: &AppState,
    actor: &Actor,
    id: i64,
) -> Result<quotes::Quote, AppError> {
    let quote = quotes::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::QuoteNotFound))?;

    let visible = match actor.role {
        Role::Admin => true,
        Role::Supplier => actor.supplier_profile_id == Some(quote.supplier_id),
        Role::Buyer => {
            let rfq = rfqs::find_by_id(&state.pool, quote.rfq_id)
                .await
                .map_err(internal)?;
            rfq.is_some_and(|r| r.buyer_id == actor.user_id)
        }
    };
    if !visible {
        return Err(AppError::forbidden("not your quote"));
    }
    Ok(quote)
}

/// Price every submitted line against the stored RFQ items and sum the total.
///
/// Every line must reference an item of this RFQ, at most once, with a
/// parseable non-negative unit price. Quantities come from the RFQ, never
/// from the submission.
fn compute_quote_lines(
    rfq_items: &[rfqs::RfqItem],
    lines: &[QuoteLineInput],
) -> Result<(Vec<NewQuoteItem>, Decimal), AppError> {
    if lines.is_empty() {
        return Err(AppError::new(ErrorCode::QuoteEmptyItems));
    }

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for line in lines {
        if !seen.insert(line.rfq_item_id) {
            return Err(AppError::with_message(
                ErrorCode::QuoteItemForeign,
                format!("duplicate rfq_item_id {}", line.rfq_item_id),
            ));
        }
        let rfq_item = rfq_items
            .iter()
            .find(|item| item.id == line.rfq_item_id)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::QuoteItemForeign,
                    format!("rfq_item_id {} does not belong to this RFQ", line.rfq_item_id),
                )
            })?;

        let unit_price: Decimal = line
            .unit_price
            .trim()
            .parse()
            .map_err(|_| AppError::new(ErrorCode::QuoteInvalidPrice))?;
        if unit_price < Decimal::ZERO {
            return Err(AppError::new(ErrorCode::QuoteInvalidPrice));
        }
        let quantity: Decimal = rfq_item.quantity.parse().map_err(|e| {
            tracing::error!(rfq_item_id = rfq_item.id, "Unparseable stored quantity: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

        let subtotal = unit_price * quantity;
        total += subtotal;
        out.push(NewQuoteItem {
            rfq_item_id: rfq_item.id,
            unit_price: format_amount(unit_price),
            quantity: rfq_item.quantity.clone(),
            subtotal: format_amount(subtotal),
        });
    }

    Ok((out, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, quantity: &str) -> rfqs::RfqItem {
        rfqs::RfqItem {
            id,
            rfq_id: 1,
            product_id: None,
            description: format!("item {id}"),
            quantity: quantity.to_string(),
            unit: "ea".to_string(),
        }
    }

    fn line(rfq_item_id: i64, unit_price: &str) -> QuoteLineInput {
        QuoteLineInput {
            rfq_item_id,
            unit_price: unit_price.to_string(),
        }
    }

    #[test]
    fn test_subtotal_and_total() {
        let items = [item(1, "10"), item(2, "3.5")];
        let lines = [line(1, "12.50"), line(2, "2.00")];
        let (out, total) = compute_quote_lines(&items, &lines).unwrap();

        assert_eq!(out[0].subtotal, "125.00");
        assert_eq!(out[1].subtotal, "7.00");
        assert_eq!(format_amount(total), "132.00");
    }

    #[test]
    fn test_quantity_comes_from_rfq_item() {
        let items = [item(7, "4")];
        let (out, _) = compute_quote_lines(&items, &[line(7, "1.25")]).unwrap();
        assert_eq!(out[0].quantity, "4");
        assert_eq!(out[0].subtotal, "5.00");
    }

    #[test]
    fn test_empty_lines_rejected() {
        let err = compute_quote_lines(&[item(1, "1")], &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuoteEmptyItems);
    }

    #[test]
    fn test_foreign_item_rejected() {
        let err = compute_quote_lines(&[item(1, "1")], &[line(99, "1.00")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuoteItemForeign);
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let items = [item(1, "2")];
        let err =
            compute_quote_lines(&items, &[line(1, "1.00"), line(1, "2.00")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuoteItemForeign);
    }

    #[test]
    fn test_bad_price_rejected() {
        let items = [item(1, "2")];
        assert_eq!(
            compute_quote_lines(&items, &[line(1, "abc")]).unwrap_err().code,
            ErrorCode::QuoteInvalidPrice
        );
        assert_eq!(
            compute_quote_lines(&items, &[line(1, "-0.01")]).unwrap_err().code,
            ErrorCode::QuoteInvalidPrice
        );
    }

    #[test]
    fn test_prices_rescaled_to_cents() {
        let items = [item(1, "3")];
        let (out, total) = compute_quote_lines(&items, &[line(1, "1.5")]).unwrap();
        assert_eq!(out[0].unit_price, "1.50");
        assert_eq!(out[0].subtotal, "4.50");
        assert_eq!(format_amount(total), "4.50");
    }
}
