//! Printable document rendering
//!
//! Builds complete standalone HTML documents (inline styles, no external
//! assets) from typed view models: deal form, helmet invoice, accessories
//! invoice, stock-transfer challan and day book. The client opens the
//! returned page in a new tab and prints it; the server never produces a
//! PDF for these flows.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::reference::Declaration;
use crate::services::pricing::{
    AccessoryBillingItem, AccessoryBillingTotals, DerivedLine, HelmetRounding, PriceBreakdown,
};

/// Fallback legal paragraph used when no declarations are configured for a
/// form type.
pub const DEFAULT_DECLARATION: &str = "I/We hereby declare that the particulars given above \
are true and correct, that I/We have read and understood the terms of sale, and that the \
vehicle described above has been received by me/us in good condition.";

/// Sort declarations by ascending priority and take their text, falling
/// back to the fixed legal paragraph when none exist.
pub fn declarations_or_default(mut declarations: Vec<Declaration>) -> Vec<String> {
    if declarations.is_empty() {
        return vec![DEFAULT_DECLARATION.to_string()];
    }
    declarations.sort_by_key(|d| d.priority);
    declarations.into_iter().map(|d| d.content).collect()
}

/// Escape text interpolated into the document markup
pub fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Letterhead shared by every document
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub branch_name: String,
    pub branch_address: String,
    pub branch_gstin: Option<String>,
}

const STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;font-size:12px;margin:24px;color:#111}\
h1{font-size:18px;margin:0}h2{font-size:14px;margin:4px 0}\
table{width:100%;border-collapse:collapse;margin-top:8px}\
th,td{border:1px solid #444;padding:4px 6px;text-align:left}\
td.num,th.num{text-align:right}\
.letterhead{text-align:center;border-bottom:2px solid #111;padding-bottom:8px}\
.totals td{font-weight:bold}.decl{margin-top:16px;font-size:11px}\
.sign{margin-top:48px;display:flex;justify-content:space-between}";

fn document_shell(title: &str, meta: &DocumentMeta, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 1024);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>");
    html.push_str(&html_escape(title));
    html.push_str("</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body><div class=\"letterhead\"><h1>");
    html.push_str(&html_escape(&meta.branch_name));
    html.push_str("</h1><div>");
    html.push_str(&html_escape(&meta.branch_address));
    html.push_str("</div>");
    if let Some(gstin) = &meta.branch_gstin {
        html.push_str("<div>GSTIN: ");
        html.push_str(&html_escape(gstin));
        html.push_str("</div>");
    }
    html.push_str("<h2>");
    html.push_str(&html_escape(title));
    html.push_str("</h2></div>");
    html.push_str(body);
    html.push_str("</body></html>");
    html
}

fn declarations_block(declarations: &[String]) -> String {
    let mut block = String::from("<div class=\"decl\"><h2>Declaration</h2>");
    for declaration in declarations {
        block.push_str("<p>");
        block.push_str(&html_escape(declaration));
        block.push_str("</p>");
    }
    block.push_str("</div><div class=\"sign\"><span>Customer Signature</span><span>Authorized Signatory</span></div>");
    block
}

/// Deal form view model: booking identity, customer block, itemized price
/// table and the Total(A)/Total(B) summary.
#[derive(Debug, Clone)]
pub struct DealFormView {
    pub meta: DocumentMeta,
    pub booking_number: String,
    pub booking_date: String,
    pub customer_name: String,
    pub customer_address: String,
    pub customer_mobile: String,
    pub customer_pan: String,
    pub customer_type: String,
    pub gstin: Option<String>,
    pub model_name: String,
    pub color_name: String,
    pub chassis_number: Option<String>,
    pub breakdown: PriceBreakdown,
    pub declarations: Vec<String>,
}

pub fn render_deal_form(view: &DealFormView) -> String {
    let mut body = String::new();

    body.push_str("<table><tr><td>Booking No: ");
    body.push_str(&html_escape(&view.booking_number));
    body.push_str("</td><td>Date: ");
    body.push_str(&html_escape(&view.booking_date));
    body.push_str("</td></tr><tr><td>Customer: ");
    body.push_str(&html_escape(&view.customer_name));
    body.push_str("</td><td>Mobile: ");
    body.push_str(&html_escape(&view.customer_mobile));
    body.push_str("</td></tr><tr><td>Address: ");
    body.push_str(&html_escape(&view.customer_address));
    body.push_str("</td><td>PAN: ");
    body.push_str(&html_escape(&view.customer_pan));
    body.push_str("</td></tr><tr><td>Customer Type: ");
    body.push_str(&html_escape(&view.customer_type));
    body.push_str("</td><td>");
    if let Some(gstin) = &view.gstin {
        body.push_str("GSTIN: ");
        body.push_str(&html_escape(gstin));
    }
    body.push_str("</td></tr><tr><td>Model: ");
    body.push_str(&html_escape(&view.model_name));
    body.push_str(" / ");
    body.push_str(&html_escape(&view.color_name));
    body.push_str("</td><td>Chassis No: ");
    if let Some(chassis) = &view.chassis_number {
        body.push_str(&html_escape(chassis));
    }
    body.push_str("</td></tr></table>");

    body.push_str(
        "<table><tr><th>Particulars</th><th>HSN</th><th class=\"num\">Taxable</th>\
         <th class=\"num\">CGST</th><th class=\"num\">SGST</th>\
         <th class=\"num\">Discount</th><th class=\"num\">Amount</th></tr>",
    );
    for line in &view.breakdown.lines {
        body.push_str("<tr><td>");
        body.push_str(&html_escape(&line.key));
        body.push_str("</td><td>");
        body.push_str(&html_escape(&line.hsn_code));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(line.taxable_value));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(line.cgst_amount));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(line.sgst_amount));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(line.discount));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(line.line_total));
        body.push_str("</td></tr>");
    }
    body.push_str("<tr class=\"totals\"><td colspan=\"6\">Total (A)</td><td class=\"num\">");
    body.push_str(&money(view.breakdown.total_a));
    body.push_str("</td></tr></table>");

    // Insurance / RTO / hypothecation leave the itemized table and show as
    // three fixed summary rows.
    body.push_str("<table><tr><td>Insurance</td><td class=\"num\">");
    body.push_str(&money(view.breakdown.insurance_total));
    body.push_str("</td></tr><tr><td>RTO</td><td class=\"num\">");
    body.push_str(&money(view.breakdown.rto_total));
    body.push_str("</td></tr><tr><td>Hypothecation</td><td class=\"num\">");
    body.push_str(&money(view.breakdown.hypothecation_total));
    body.push_str("</td></tr><tr class=\"totals\"><td>Total (B)</td><td class=\"num\">");
    body.push_str(&money(view.breakdown.total_b));
    body.push_str("</td></tr><tr class=\"totals\"><td>Grand Total</td><td class=\"num\">");
    body.push_str(&money(view.breakdown.grand_total));
    body.push_str("</td></tr></table>");

    body.push_str(&declarations_block(&view.declarations));

    document_shell("Deal Form", &view.meta, &body)
}

/// Helmet invoice: a single line with the flat round-off step
#[derive(Debug, Clone)]
pub struct HelmetInvoiceView {
    pub meta: DocumentMeta,
    pub invoice_number: String,
    pub invoice_date: String,
    pub customer_name: String,
    pub chassis_number: Option<String>,
    pub line: DerivedLine,
    pub rounding: HelmetRounding,
    pub declarations: Vec<String>,
}

pub fn render_helmet_invoice(view: &HelmetInvoiceView) -> String {
    let mut body = String::new();

    body.push_str("<table><tr><td>Invoice No: ");
    body.push_str(&html_escape(&view.invoice_number));
    body.push_str("</td><td>Date: ");
    body.push_str(&html_escape(&view.invoice_date));
    body.push_str("</td></tr><tr><td>Customer: ");
    body.push_str(&html_escape(&view.customer_name));
    body.push_str("</td><td>Chassis No: ");
    if let Some(chassis) = &view.chassis_number {
        body.push_str(&html_escape(chassis));
    }
    body.push_str("</td></tr></table>");

    body.push_str(
        "<table><tr><th>Particulars</th><th>HSN</th><th class=\"num\">Taxable</th>\
         <th class=\"num\">CGST</th><th class=\"num\">SGST</th><th class=\"num\">Amount</th></tr><tr><td>",
    );
    body.push_str(&html_escape(&view.line.key));
    body.push_str("</td><td>");
    body.push_str(&html_escape(&view.line.hsn_code));
    body.push_str("</td><td class=\"num\">");
    body.push_str(&money(view.line.taxable_value));
    body.push_str("</td><td class=\"num\">");
    body.push_str(&money(view.line.cgst_amount));
    body.push_str("</td><td class=\"num\">");
    body.push_str(&money(view.line.sgst_amount));
    body.push_str("</td><td class=\"num\">");
    body.push_str(&money(view.line.line_total));
    body.push_str("</td></tr><tr><td colspan=\"5\">Round Off</td><td class=\"num\">");
    body.push_str(&money(view.rounding.round_off));
    body.push_str("</td></tr><tr class=\"totals\"><td colspan=\"5\">Net Total</td><td class=\"num\">");
    body.push_str(&money(view.rounding.net_total));
    body.push_str("</td></tr></table>");

    body.push_str(&declarations_block(&view.declarations));

    document_shell("Helmet Invoice", &view.meta, &body)
}

/// Accessories invoice (GST-exclusive billing)
#[derive(Debug, Clone)]
pub struct AccessoriesInvoiceView {
    pub meta: DocumentMeta,
    pub invoice_number: String,
    pub invoice_date: String,
    pub customer_name: String,
    pub items: Vec<AccessoryBillingItem>,
    pub totals: AccessoryBillingTotals,
    pub declarations: Vec<String>,
}

pub fn render_accessories_invoice(view: &AccessoriesInvoiceView) -> String {
    let mut body = String::new();

    body.push_str("<table><tr><td>Invoice No: ");
    body.push_str(&html_escape(&view.invoice_number));
    body.push_str("</td><td>Date: ");
    body.push_str(&html_escape(&view.invoice_date));
    body.push_str("</td><td>Customer: ");
    body.push_str(&html_escape(&view.customer_name));
    body.push_str("</td></tr></table>");

    body.push_str(
        "<table><tr><th>Item</th><th class=\"num\">Rate</th><th class=\"num\">Qty</th>\
         <th class=\"num\">GST %</th><th class=\"num\">Amount</th></tr>",
    );
    for item in &view.items {
        let line_amount = item.price * Decimal::from(item.quantity);
        body.push_str("<tr><td>");
        body.push_str(&html_escape(&item.name));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(item.price));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&item.quantity.to_string());
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(item.gst_rate));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(line_amount));
        body.push_str("</td></tr>");
    }
    body.push_str("<tr><td colspan=\"4\">Subtotal</td><td class=\"num\">");
    body.push_str(&money(view.totals.subtotal));
    body.push_str("</td></tr><tr><td colspan=\"4\">GST</td><td class=\"num\">");
    body.push_str(&money(view.totals.gst_total));
    body.push_str("</td></tr><tr class=\"totals\"><td colspan=\"4\">Grand Total</td><td class=\"num\">");
    body.push_str(&money(view.totals.grand_total));
    body.push_str("</td></tr></table>");

    body.push_str(&declarations_block(&view.declarations));

    document_shell("Accessories Invoice", &view.meta, &body)
}

/// Stock-transfer challan: vehicle identity numbers plus the movement
#[derive(Debug, Clone)]
pub struct ChallanView {
    pub meta: DocumentMeta,
    pub challan_number: String,
    pub challan_date: String,
    pub from_branch: String,
    pub to_branch: String,
    pub model_name: String,
    pub color_name: String,
    pub chassis_number: String,
    pub engine_number: String,
    pub key_number: String,
    pub battery_number: Option<String>,
    pub motor_number: Option<String>,
    pub charger_number: Option<String>,
    pub note: Option<String>,
}

pub fn render_challan(view: &ChallanView) -> String {
    let mut body = String::new();

    body.push_str("<table><tr><td>Challan No: ");
    body.push_str(&html_escape(&view.challan_number));
    body.push_str("</td><td>Date: ");
    body.push_str(&html_escape(&view.challan_date));
    body.push_str("</td></tr><tr><td>From: ");
    body.push_str(&html_escape(&view.from_branch));
    body.push_str("</td><td>To: ");
    body.push_str(&html_escape(&view.to_branch));
    body.push_str("</td></tr></table>");

    body.push_str("<table><tr><th>Model</th><th>Color</th><th>Chassis No</th><th>Engine No</th><th>Key No</th></tr><tr><td>");
    body.push_str(&html_escape(&view.model_name));
    body.push_str("</td><td>");
    body.push_str(&html_escape(&view.color_name));
    body.push_str("</td><td>");
    body.push_str(&html_escape(&view.chassis_number));
    body.push_str("</td><td>");
    body.push_str(&html_escape(&view.engine_number));
    body.push_str("</td><td>");
    body.push_str(&html_escape(&view.key_number));
    body.push_str("</td></tr></table>");

    if view.battery_number.is_some() || view.motor_number.is_some() || view.charger_number.is_some()
    {
        body.push_str("<table><tr><th>Battery No</th><th>Motor No</th><th>Charger No</th></tr><tr><td>");
        body.push_str(&html_escape(view.battery_number.as_deref().unwrap_or("-")));
        body.push_str("</td><td>");
        body.push_str(&html_escape(view.motor_number.as_deref().unwrap_or("-")));
        body.push_str("</td><td>");
        body.push_str(&html_escape(view.charger_number.as_deref().unwrap_or("-")));
        body.push_str("</td></tr></table>");
    }

    if let Some(note) = &view.note {
        body.push_str("<p>Note: ");
        body.push_str(&html_escape(note));
        body.push_str("</p>");
    }

    body.push_str(
        "<div class=\"sign\"><span>Dispatched By</span><span>Received By</span></div>",
    );

    document_shell("Delivery Challan", &view.meta, &body)
}

/// One row of the day book
#[derive(Debug, Clone)]
pub struct DayBookEntry {
    pub booking_number: String,
    pub customer_name: String,
    pub model_name: String,
    pub payment_type: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct DayBookView {
    pub meta: DocumentMeta,
    pub date: NaiveDate,
    pub entries: Vec<DayBookEntry>,
    pub total: Decimal,
}

pub fn render_day_book(view: &DayBookView) -> String {
    let mut body = String::new();

    body.push_str("<p>Date: ");
    body.push_str(&view.date.format("%d-%m-%Y").to_string());
    body.push_str("</p>");

    body.push_str(
        "<table><tr><th>Booking No</th><th>Customer</th><th>Model</th><th>Payment</th>\
         <th class=\"num\">Amount</th></tr>",
    );
    for entry in &view.entries {
        body.push_str("<tr><td>");
        body.push_str(&html_escape(&entry.booking_number));
        body.push_str("</td><td>");
        body.push_str(&html_escape(&entry.customer_name));
        body.push_str("</td><td>");
        body.push_str(&html_escape(&entry.model_name));
        body.push_str("</td><td>");
        body.push_str(&html_escape(&entry.payment_type));
        body.push_str("</td><td class=\"num\">");
        body.push_str(&money(entry.amount));
        body.push_str("</td></tr>");
    }
    body.push_str("<tr class=\"totals\"><td colspan=\"4\">Total</td><td class=\"num\">");
    body.push_str(&money(view.total));
    body.push_str("</td></tr></table>");

    document_shell("Day Book", &view.meta, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::PriceComponentRecord;
    use crate::services::pricing::{accessories_totals, derive_breakdown, derive_line, helmet_rounding};
    use std::str::FromStr;
    use uuid::Uuid;

    fn meta() -> DocumentMeta {
        DocumentMeta {
            branch_name: "Sai Motors".to_string(),
            branch_address: "Solapur".to_string(),
            branch_gstin: Some("27AAAAP0267H2ZN".to_string()),
        }
    }

    fn declaration(content: &str, priority: i32) -> Declaration {
        Declaration {
            id: Uuid::new_v4(),
            form_type: "deal_form".to_string(),
            content: content.to_string(),
            priority,
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("M&S <Motors>"), "M&amp;S &lt;Motors&gt;");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_declarations_sorted_by_priority() {
        let declarations = vec![
            declaration("second", 2),
            declaration("first", 1),
            declaration("third", 3),
        ];
        let texts = declarations_or_default(declarations);
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_declarations_fall_back_to_default() {
        let texts = declarations_or_default(vec![]);
        assert_eq!(texts, vec![DEFAULT_DECLARATION.to_string()]);
    }

    #[test]
    fn test_deal_form_contains_totals_and_is_idempotent() {
        let components = vec![
            PriceComponentRecord {
                header_id: Uuid::new_v4(),
                key: "EX SHOWROOM".to_string(),
                hsn_code: "8711".to_string(),
                gst_rate: rust_decimal::Decimal::from(28),
                original_value: rust_decimal::Decimal::from(1280),
                discounted_value: rust_decimal::Decimal::from(1280),
            },
            PriceComponentRecord {
                header_id: Uuid::new_v4(),
                key: "RTO TAX".to_string(),
                hsn_code: "9997".to_string(),
                gst_rate: rust_decimal::Decimal::ZERO,
                original_value: rust_decimal::Decimal::from(500),
                discounted_value: rust_decimal::Decimal::from(500),
            },
        ];
        let view = DealFormView {
            meta: meta(),
            booking_number: "BK-0042".to_string(),
            booking_date: "2024-01-15".to_string(),
            customer_name: "Ramesh & Sons".to_string(),
            customer_address: "12 Market Road".to_string(),
            customer_mobile: "9876543210".to_string(),
            customer_pan: "ABCDE1234F".to_string(),
            customer_type: "B2C".to_string(),
            gstin: None,
            model_name: "Strider EV".to_string(),
            color_name: "Red".to_string(),
            chassis_number: Some("MD626AL55C1F12345".to_string()),
            breakdown: derive_breakdown(&components),
            declarations: declarations_or_default(vec![]),
        };

        let html = render_deal_form(&view);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Ramesh &amp; Sons"));
        assert!(html.contains("Grand Total"));
        assert!(html.contains("1780.00")); // 1280 itemized + 500 RTO
        assert!(html.contains(DEFAULT_DECLARATION));
        // Byte-identical across renders
        assert_eq!(html, render_deal_form(&view));
    }

    #[test]
    fn test_helmet_invoice_shows_round_off() {
        let component = PriceComponentRecord {
            header_id: Uuid::new_v4(),
            key: "HELMET".to_string(),
            hsn_code: "6506".to_string(),
            gst_rate: rust_decimal::Decimal::from(18),
            original_value: rust_decimal::Decimal::from_str("678.40").unwrap(),
            discounted_value: rust_decimal::Decimal::from_str("678.40").unwrap(),
        };
        let view = HelmetInvoiceView {
            meta: meta(),
            invoice_number: "HM-0007".to_string(),
            invoice_date: "2024-01-15".to_string(),
            customer_name: "Ramesh Patil".to_string(),
            chassis_number: None,
            line: derive_line(&component),
            rounding: helmet_rounding(component.discounted_value),
            declarations: declarations_or_default(vec![]),
        };

        let html = render_helmet_invoice(&view);
        assert!(html.contains("Round Off"));
        assert!(html.contains("-0.40"));
        assert!(html.contains("678.00"));
    }

    #[test]
    fn test_accessories_invoice_totals() {
        let items = vec![AccessoryBillingItem {
            name: "Seat Cover".to_string(),
            price: rust_decimal::Decimal::from(100),
            quantity: 2,
            gst_rate: rust_decimal::Decimal::from(18),
        }];
        let view = AccessoriesInvoiceView {
            meta: meta(),
            invoice_number: "AC-0012".to_string(),
            invoice_date: "2024-01-15".to_string(),
            customer_name: "Ramesh Patil".to_string(),
            totals: accessories_totals(&items),
            items,
            declarations: declarations_or_default(vec![]),
        };

        let html = render_accessories_invoice(&view);
        assert!(html.contains("236.00"));
    }

    #[test]
    fn test_challan_renders_ev_identity_block_only_when_present() {
        let mut view = ChallanView {
            meta: meta(),
            challan_number: "CH-0003".to_string(),
            challan_date: "2024-01-15".to_string(),
            from_branch: "Solapur HO".to_string(),
            to_branch: "Barshi".to_string(),
            model_name: "Strider EV".to_string(),
            color_name: "Red".to_string(),
            chassis_number: "MD626AL55C1F12345".to_string(),
            engine_number: "E12345".to_string(),
            key_number: "K9".to_string(),
            battery_number: Some("BAT-1".to_string()),
            motor_number: None,
            charger_number: None,
            note: None,
        };

        let html = render_challan(&view);
        assert!(html.contains("Battery No"));

        view.battery_number = None;
        let html = render_challan(&view);
        assert!(!html.contains("Battery No"));
    }
}
