// SPDX-FileCopyrightText: 2026 Dukkan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arabic message templates for every resolver outcome.
//!
//! Rendering is pure string work; delivery and routing stay with the host's
//! [`dukkan_core::traits::Notifier`] implementation.

use std::fmt::Write;

use dukkan_core::types::{
    NoteKind, OutboundNote, PendingSelection, RejectReason, ResolveOutcome, ResolvedOrder,
    SelectionCandidate, SelectionKind, StockAlert,
};

/// Shown in stock alerts raised before a phone line was found.
pub const PHONE_PLACEHOLDER: &str = "غير معروف";

/// Render the user-facing note for a resolver outcome.
pub fn render_outcome(outcome: &ResolveOutcome) -> OutboundNote {
    match outcome {
        ResolveOutcome::Order(order) => note(NoteKind::Confirmation, confirmation(order)),
        ResolveOutcome::SelectionPrompt(selection) => {
            note(NoteKind::SelectionPrompt, selection_prompt(selection))
        }
        ResolveOutcome::InvalidSelection(selection) => {
            note(NoteKind::InvalidSelection, invalid_selection(selection))
        }
        ResolveOutcome::NoPendingSelection => note(
            NoteKind::NoPendingSelection,
            "لا يوجد اختيار معلق. أرسل طلبك كاملاً من فضلك.".to_string(),
        ),
        ResolveOutcome::StockAlert(alert) => note(NoteKind::StockAlert, stock_alert(alert)),
        ResolveOutcome::DuplicateAck => note(
            NoteKind::DuplicateAck,
            "تم استلام هذه الرسالة سابقاً وهي قيد المعالجة.".to_string(),
        ),
        ResolveOutcome::Rejected(reason) => note(NoteKind::Rejection, rejection(reason)),
    }
}

fn note(kind: NoteKind, text: String) -> OutboundNote {
    OutboundNote { kind, text }
}

fn confirmation(order: &ResolvedOrder) -> String {
    let mut text = String::from("تم استلام الطلب ✅\n");
    let _ = writeln!(text, "الاسم: {}", order.customer_name);
    let _ = writeln!(text, "الهاتف: {}", order.phone);
    let _ = writeln!(text, "المدينة: {}", order.city_name);
    let _ = writeln!(text, "المنطقة: {}", order.region_name);
    let _ = writeln!(text, "الطلب:");
    for line in &order.lines {
        let _ = writeln!(
            text,
            "- {}{} عدد {} بسعر {} د.ع",
            line.product_name,
            attributes(line.color.as_deref(), line.size.as_deref()),
            line.quantity,
            line.unit_price
        );
    }
    let _ = write!(text, "المجموع: {} د.ع", order.total);
    text
}

fn selection_prompt(selection: &PendingSelection) -> String {
    format!(
        "وجدنا أكثر من {} تطابق طلبك:\n{}\nأرسل رقم الاختيار، أو \"{}: الاسم\".",
        kind_noun(selection.kind),
        numbered(&selection.candidates),
        kind_label(selection.kind)
    )
}

fn invalid_selection(selection: &PendingSelection) -> String {
    format!(
        "لم نفهم اختيارك. الخيارات المتاحة:\n{}\nأرسل رقم الاختيار، أو \"{}: الاسم\".",
        numbered(&selection.candidates),
        kind_label(selection.kind)
    )
}

fn stock_alert(alert: &StockAlert) -> String {
    let mut text = String::from("تنبيه مخزون ⚠️\n");
    let _ = writeln!(text, "الهاتف: {}", alert.phone);
    let _ = writeln!(
        text,
        "المنتج: {}{}",
        alert.product_name,
        attributes(alert.color.as_deref(), alert.size.as_deref())
    );
    let _ = writeln!(text, "الكمية المطلوبة: {}", alert.quantity);
    let _ = write!(text, "السبب: الكمية المطلوبة غير متوفرة في المخزون حالياً");
    text
}

fn rejection(reason: &RejectReason) -> String {
    match reason {
        RejectReason::RegionNotFound { city_name } => format!(
            "لم نتمكن من تحديد المنطقة ضمن {city_name}. يرجى إعادة إرسال العنوان مع ذكر اسم المنطقة."
        ),
        RejectReason::ProductNotFound { line } => {
            format!("لم نجد هذا المنتج في القائمة: {line}")
        }
        RejectReason::MissingPhone => {
            "الرجاء تضمين رقم الهاتف في الطلب (مثال: 07701234567).".to_string()
        }
        RejectReason::MalformedMessage => "لم نتمكن من قراءة الطلب. الصيغة المتوقعة:\n\
             الاسم\n\
             07xxxxxxxxx\n\
             المدينة والمنطقة\n\
             المنتج واللون والقياس"
            .to_string(),
    }
}

/// `" (color / size)"` with absent dimensions dropped; empty when neither
/// is known.
fn attributes(color: Option<&str>, size: Option<&str>) -> String {
    match (color, size) {
        (Some(c), Some(s)) => format!(" ({c} / {s})"),
        (Some(c), None) => format!(" ({c})"),
        (None, Some(s)) => format!(" ({s})"),
        (None, None) => String::new(),
    }
}

fn numbered(candidates: &[SelectionCandidate]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c.label))
        .collect::<Vec<_>>()
        .join("\n")
}

fn kind_noun(kind: SelectionKind) -> &'static str {
    match kind {
        SelectionKind::Region => "منطقة واحدة",
        SelectionKind::Variant => "منتج واحد",
    }
}

fn kind_label(kind: SelectionKind) -> &'static str {
    match kind {
        SelectionKind::Region => "المنطقة",
        SelectionKind::Variant => "المنتج",
    }
}
