// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Final order composition.
//!
//! Assembly never partially succeeds: every mandatory field must be present
//! or the whole message is rejected with a typed reason. The total is always
//! recomputed from the lines, never trusted from upstream.

use dukkan_core::types::{
    City, InboundMessage, OrderLine, Product, Region, RejectReason, ResolvedOrder, Variant,
};

use crate::classify::MessageParts;
use crate::product::{ProductLineDraft, price_resolution_policy};

/// Build one order line from a matched product, its selected variant, and
/// the extracted draft. Attribute display values come from the catalog
/// variant when one exists, falling back to what the customer wrote.
pub fn order_line(
    product: &Product,
    variant: Option<&Variant>,
    draft: &ProductLineDraft,
) -> OrderLine {
    let unit_price = price_resolution_policy(
        draft.explicit_price,
        variant.and_then(|v| v.price),
        product.base_price,
    );
    OrderLine {
        product_id: product.id,
        product_name: product.name.clone(),
        color: variant
            .and_then(|v| v.color.clone())
            .or_else(|| draft.color.clone()),
        size: variant
            .and_then(|v| v.size.clone())
            .or_else(|| draft.size.clone()),
        quantity: draft.quantity,
        unit_price,
        line_total: unit_price * i64::from(draft.quantity),
    }
}

/// Compose the resolved order, or reject with the first missing mandatory
/// field. The customer name falls back to the channel profile name when the
/// message itself had no name line.
///
/// `original_text` is the text the parse actually ran on. After a selection
/// replay it differs from `message.text`, which is just the reply.
pub fn assemble_order(
    message: &InboundMessage,
    original_text: &str,
    parts: &MessageParts,
    city: &City,
    region: &Region,
    lines: Vec<OrderLine>,
) -> Result<ResolvedOrder, RejectReason> {
    debug_assert_eq!(region.city_id, city.id);

    let Some(phone) = parts.phone.clone() else {
        return Err(RejectReason::MissingPhone);
    };
    let customer_name = parts
        .customer_name
        .clone()
        .or_else(|| message.sender_name.clone())
        .ok_or(RejectReason::MalformedMessage)?;
    if lines.is_empty() {
        return Err(RejectReason::MalformedMessage);
    }

    let total = lines.iter().map(|l| l.line_total).sum();
    Ok(ResolvedOrder {
        customer_name,
        phone,
        city_id: city.id,
        city_name: city.name.clone(),
        region_id: region.id,
        region_name: region.name.clone(),
        address: parts.address.clone(),
        lines,
        total,
        source: message.source.clone(),
        conversation_id: message.conversation_id.clone(),
        raw_text: original_text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use dukkan_core::types::{CityId, ProductId, RegionId, VariantId};

    use super::*;

    fn message() -> InboundMessage {
        InboundMessage {
            conversation_id: dukkan_core::types::ConversationId("chat-1".to_string()),
            source: "telegram".to_string(),
            sender_name: Some("Ahmed TG".to_string()),
            text: "النص الخام".to_string(),
        }
    }

    fn parts() -> MessageParts {
        MessageParts {
            customer_name: Some("احمد علي".to_string()),
            phone: Some("07701234567".to_string()),
            product_lines: vec!["برشلونة ازرق لارج".to_string()],
            address: "ديوانية غماس".to_string(),
        }
    }

    fn city() -> City {
        City {
            id: CityId(2),
            name: "الديوانية".to_string(),
            active: true,
        }
    }

    fn region() -> Region {
        Region {
            id: RegionId(7),
            city_id: CityId(2),
            name: "غماس".to_string(),
            active: true,
        }
    }

    fn line(unit_price: i64, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: ProductId(1),
            product_name: "برشلونة".to_string(),
            color: Some("أزرق".to_string()),
            size: Some("L".to_string()),
            quantity,
            unit_price,
            line_total: unit_price * i64::from(quantity),
        }
    }

    #[test]
    fn total_is_recomputed_from_lines() {
        let m = message();
        let order = assemble_order(
            &m,
            &m.text,
            &parts(),
            &city(),
            &region(),
            vec![line(25_000, 2), line(10_000, 1)],
        )
        .unwrap();
        assert_eq!(order.total, 60_000);
        assert_eq!(order.customer_name, "احمد علي");
        assert_eq!(order.phone, "07701234567");
        assert_eq!(order.city_name, "الديوانية");
        assert_eq!(order.region_name, "غماس");
    }

    #[test]
    fn raw_text_records_the_parsed_text_not_the_reply() {
        let m = message();
        let order = assemble_order(
            &m,
            "النص الذي أعيد تشغيله",
            &parts(),
            &city(),
            &region(),
            vec![line(25_000, 1)],
        )
        .unwrap();
        assert_eq!(order.raw_text, "النص الذي أعيد تشغيله");
        assert_eq!(order.source, "telegram");
    }

    #[test]
    fn missing_phone_is_rejected_first() {
        let mut p = parts();
        p.phone = None;
        let m = message();
        let err = assemble_order(&m, &m.text, &p, &city(), &region(), vec![line(25_000, 1)]);
        assert_eq!(err.unwrap_err(), RejectReason::MissingPhone);
    }

    #[test]
    fn name_falls_back_to_the_channel_profile() {
        let mut p = parts();
        p.customer_name = None;
        let m = message();
        let order =
            assemble_order(&m, &m.text, &p, &city(), &region(), vec![line(25_000, 1)]).unwrap();
        assert_eq!(order.customer_name, "Ahmed TG");
    }

    #[test]
    fn no_name_anywhere_is_malformed() {
        let mut p = parts();
        p.customer_name = None;
        let mut m = message();
        m.sender_name = None;
        let err = assemble_order(&m, &m.text, &p, &city(), &region(), vec![line(25_000, 1)]);
        assert_eq!(err.unwrap_err(), RejectReason::MalformedMessage);
    }

    #[test]
    fn no_lines_is_malformed() {
        let m = message();
        let err = assemble_order(&m, &m.text, &parts(), &city(), &region(), Vec::new());
        assert_eq!(err.unwrap_err(), RejectReason::MalformedMessage);
    }

    #[test]
    fn line_attributes_prefer_the_catalog_variant() {
        let product = Product {
            id: ProductId(1),
            name: "برشلونة".to_string(),
            base_price: 20_000,
            active: true,
            variants: vec![],
        };
        let variant = Variant {
            id: VariantId(1),
            product_id: ProductId(1),
            color: Some("أزرق".to_string()),
            size: Some("L".to_string()),
            price: Some(25_000),
            on_hand: 5,
            reserved: 0,
        };
        let draft = ProductLineDraft {
            raw: "برشلونة ازرق لارج 2 قطعة".to_string(),
            name: "برشلونه".to_string(),
            color: Some("ازرق".to_string()),
            size: Some("l".to_string()),
            quantity: 2,
            explicit_price: None,
        };
        let l = order_line(&product, Some(&variant), &draft);
        assert_eq!(l.color.as_deref(), Some("أزرق"));
        assert_eq!(l.size.as_deref(), Some("L"));
        assert_eq!(l.unit_price, 25_000);
        assert_eq!(l.line_total, 50_000);
    }

    #[test]
    fn line_price_honors_the_precedence_chain() {
        let product = Product {
            id: ProductId(1),
            name: "قميص".to_string(),
            base_price: 12_000,
            active: true,
            variants: vec![],
        };
        let draft = ProductLineDraft {
            raw: "قميص - 8000".to_string(),
            name: "قميص".to_string(),
            color: None,
            size: None,
            quantity: 1,
            explicit_price: Some(8_000),
        };
        let l = order_line(&product, None, &draft);
        assert_eq!(l.unit_price, 8_000);

        let without_explicit = ProductLineDraft {
            explicit_price: None,
            ..draft
        };
        let l = order_line(&product, None, &without_explicit);
        assert_eq!(l.unit_price, 12_000);
        assert_eq!(l.color, None);
    }
}
