//! Black-on-white layout: logo mark and "NO." header, a big title, two
//! party columns, a light table, the raw total and a wave footer.

use std::f32::consts::PI;

use crate::draw::{Canvas, Color, Page, TextAlign, TextStyle};
use crate::font_metrics::FontFace;
use crate::format;
use crate::invoice::{InvoiceItem, InvoiceRecord};

use super::{draw_party, row_height, tax_label, InvoiceTemplate, PartyLayout, TemplateSettings};

const LINE_HEIGHT: f32 = 1.4;
const MARGIN: f32 = 50.0;
const LOGO_MARK: [&str; 2] = ["YOUR", "LOGO"];

const PARTY_TOP: f32 = 290.0;
const PARTY_COLUMN_WIDTH: f32 = 200.0;
const TABLE_GAP: f32 = 60.0;

const HEADER_ROW_HEIGHT: f32 = 40.0;
const HEADER_BASELINE: f32 = 25.0;
const ROW_HEIGHT: f32 = 35.0;
const ROW_BASELINE: f32 = 22.0;
const DESCRIPTION_WIDTH: f32 = 280.0;
const TOTAL_LABEL_WIDTH: f32 = 150.0;

const PAYMENT_METHOD: &str = "Payment method: Cash";
const PAYMENT_NOTE: &str = "Note: Thank you for choosing us!";

const HEADER_FILL: Color = Color::gray(0.95);
const RULE: Color = Color::gray(0.8);
/// Row backgrounds, starting with the first item
pub(crate) const ROW_TINTS: [Color; 2] = [Color::gray(0.99), Color::WHITE];

// ============================================================================
// WAVES
// ============================================================================

/// Distance from the page bottom to the wave baseline (top-down y is
/// `height - WAVE_RISE`).
const WAVE_RISE: f32 = 180.0;
const WAVE_SAMPLE_STEP: f32 = 5.0;
const WAVE_STRIP_WIDTH: f32 = 10.0;

struct WaveBand {
    /// Half-periods across the page width
    half_periods: f32,
    phase: f32,
    amplitude: f32,
    offset: f32,
    thickness: f32,
    color: Color,
}

impl WaveBand {
    fn y_at(&self, x: f32, width: f32, start: f32) -> f32 {
        let progress = x / width;
        start + (progress * PI * self.half_periods + self.phase).sin() * self.amplitude + self.offset
    }
}

const WAVE_BANDS: [WaveBand; 2] = [
    WaveBand {
        half_periods: 3.0,
        phase: 0.0,
        amplitude: 30.0,
        offset: 20.0,
        thickness: 3.0,
        color: Color::gray(0.85),
    },
    WaveBand {
        half_periods: 2.0,
        phase: 0.5,
        amplitude: 40.0,
        offset: 60.0,
        thickness: 4.0,
        color: Color::gray(0.4),
    },
];

// ============================================================================
// TEMPLATE
// ============================================================================

#[derive(Debug, Clone)]
pub struct MinimalTemplate {
    settings: TemplateSettings,
}

impl MinimalTemplate {
    pub fn new(settings: TemplateSettings) -> Self {
        MinimalTemplate { settings }
    }

    fn content_width(canvas: &Canvas) -> f32 {
        canvas.width() - MARGIN * 2.0
    }

    fn header(&self, canvas: &mut Canvas, record: &InvoiceRecord) {
        let mark = TextStyle::new(FontFace::HelveticaBold, 14.0);
        canvas.text(LOGO_MARK[0], MARGIN, 60.0, &mark);
        canvas.text(LOGO_MARK[1], MARGIN, 78.0, &mark);

        let number = format!("NO. {}", format::badge_number(&record.invoice_number));
        let right = TextStyle::new(FontFace::Helvetica, 14.0).align(TextAlign::Right);
        canvas.text(&number, canvas.width() - MARGIN, 69.0, &right);

        canvas.text("INVOICE", MARGIN, 160.0, &TextStyle::new(FontFace::HelveticaBold, 64.0));

        let date = format!("Date: {}", format::long_date(record.date));
        canvas.text(&date, MARGIN, 240.0, &TextStyle::new(FontFace::HelveticaBold, 12.0));
    }

    /// Returns the y below the taller of the two columns.
    fn parties(&self, canvas: &mut Canvas, record: &InvoiceRecord) -> f32 {
        let left = party_layout(MARGIN);
        let right = party_layout(canvas.width() - MARGIN - PARTY_COLUMN_WIDTH);

        let billed_to = draw_party(canvas, "Billed to:", &record.client(), &left, PARTY_TOP);
        let from = draw_party(canvas, "From:", &record.sender(), &right, PARTY_TOP);
        billed_to.max(from)
    }

    fn items_table(&self, canvas: &mut Canvas, items: &[InvoiceItem], top: f32) -> f32 {
        let width = Self::content_width(canvas);
        let item_col = MARGIN + 15.0;
        let qty_col = MARGIN + 320.0;
        let price_col = MARGIN + 400.0;
        let amount_col = MARGIN + width - 15.0;

        canvas.rect(MARGIN, top, width, HEADER_ROW_HEIGHT, HEADER_FILL);
        let heading = TextStyle::new(FontFace::HelveticaBold, 12.0);
        let baseline = top + HEADER_BASELINE;
        canvas.text("Item", item_col, baseline, &heading);
        canvas.text("Quantity", qty_col, baseline, &heading.align(TextAlign::Center));
        canvas.text("Price", price_col, baseline, &heading.align(TextAlign::Center));
        canvas.text("Amount", amount_col, baseline, &heading.align(TextAlign::Right));

        let cell = TextStyle::new(FontFace::Helvetica, 11.0);
        let description = cell.max_width(DESCRIPTION_WIDTH);
        let mut y = top + HEADER_ROW_HEIGHT;

        for (index, item) in items.iter().enumerate() {
            let height = row_height(canvas, &item.description, &description, ROW_HEIGHT);
            canvas.rect(MARGIN, y, width, height, ROW_TINTS[index % 2]);

            let baseline = y + ROW_BASELINE;
            canvas.text(&item.description, item_col, baseline, &description);
            canvas.text(&format::quantity(item.quantity), qty_col, baseline, &cell.align(TextAlign::Center));
            canvas.text(&self.settings.money(item.price), price_col, baseline, &cell.align(TextAlign::Center));
            canvas.text(&self.settings.money(item.amount()), amount_col, baseline, &cell.align(TextAlign::Right));

            y += height;
        }

        canvas.line(MARGIN, top, MARGIN + width, top, 1.0, RULE);
        canvas.line(MARGIN, y, MARGIN + width, y, 1.0, RULE);
        y
    }

    /// Returns the baseline of the final total line.
    fn totals(&self, canvas: &mut Canvas, items: &[InvoiceItem], mut y: f32) -> f32 {
        let width = Self::content_width(canvas);
        let label_x = MARGIN + width - TOTAL_LABEL_WIDTH;
        let amount_col = MARGIN + width - 15.0;
        let totals = self.settings.totals(items);

        if let (Some(tax), Some(rate)) = (totals.tax, self.settings.tax.rate()) {
            let line = TextStyle::new(FontFace::Helvetica, 12.0);
            canvas.text("Subtotal", label_x, y, &line);
            canvas.text(&self.settings.money(totals.subtotal), amount_col, y, &line.align(TextAlign::Right));
            y += 20.0;
            canvas.text(&tax_label(rate), label_x, y, &line);
            canvas.text(&self.settings.money(tax), amount_col, y, &line.align(TextAlign::Right));
            y += 25.0;
        }

        let total = TextStyle::new(FontFace::HelveticaBold, 14.0);
        canvas.text("Total", label_x, y, &total);
        canvas.text(&self.settings.money(totals.total), amount_col, y, &total.align(TextAlign::Right));
        y
    }

    fn payment_note(&self, canvas: &mut Canvas, y: f32) {
        let style = TextStyle::new(FontFace::HelveticaBold, 11.0);
        canvas.text(PAYMENT_METHOD, MARGIN, y, &style);
        canvas.text(PAYMENT_NOTE, MARGIN, y + 25.0, &style);
    }
}

fn party_layout(x: f32) -> PartyLayout {
    PartyLayout {
        label_x: x,
        name_x: x,
        detail_x: x,
        label: TextStyle::new(FontFace::HelveticaBold, 12.0),
        name: TextStyle::new(FontFace::HelveticaBold, 11.0).max_width(PARTY_COLUMN_WIDTH),
        detail: TextStyle::new(FontFace::Helvetica, 10.0).max_width(PARTY_COLUMN_WIDTH),
        name_offset: 25.0,
        name_row: 20.0,
        detail_row: 15.0,
    }
}

/// Two overlapping sine bands along the bottom edge. Each band is filled
/// with vertical strips down to the page bottom, then stroked on top.
fn draw_waves(canvas: &mut Canvas) {
    let (width, height) = (canvas.width(), canvas.height());
    let start = height - WAVE_RISE;

    let strips = (width / WAVE_STRIP_WIDTH).ceil() as usize;
    let samples = (width / WAVE_SAMPLE_STEP).floor() as usize;

    for band in &WAVE_BANDS {
        for i in 0..strips {
            let x = i as f32 * WAVE_STRIP_WIDTH;
            let y = band.y_at(x, width, start);
            canvas.rect(x, y, WAVE_STRIP_WIDTH, height - y, band.color);
        }

        let points: Vec<(f32, f32)> = (0..=samples)
            .map(|i| {
                let x = i as f32 * WAVE_SAMPLE_STEP;
                (x, band.y_at(x, width, start))
            })
            .collect();
        for pair in points.windows(2) {
            let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
            canvas.line(x1, y1, x2, y2, band.thickness, band.color);
        }
    }
}

impl InvoiceTemplate for MinimalTemplate {
    fn name(&self) -> &'static str {
        "minimal"
    }

    fn settings(&self) -> &TemplateSettings {
        &self.settings
    }

    fn render(&self, record: &InvoiceRecord) -> Page {
        let mut canvas = Canvas::a4(LINE_HEIGHT);

        self.header(&mut canvas, record);
        let parties_end = self.parties(&mut canvas, record);
        let table_end = self.items_table(&mut canvas, &record.items, parties_end + TABLE_GAP);
        let total_line = self.totals(&mut canvas, &record.items, table_end + 40.0);
        self.payment_note(&mut canvas, total_line + 80.0);
        draw_waves(&mut canvas);

        canvas.into_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use crate::template::fixtures::{acme, baseline_of, rects_of_width, with_items};
    use crate::template::TemplateKind;
    use crate::totals::TaxPolicy;

    fn template() -> MinimalTemplate {
        MinimalTemplate::new(TemplateKind::Minimal.default_settings())
    }

    fn table_width(page: &Page) -> f32 {
        page.width - MARGIN * 2.0
    }

    /// Row backgrounds are the table-width rects that aren't the header.
    fn row_rects(page: &Page) -> Vec<(f32, f32, Color)> {
        rects_of_width(page, table_width(page))
            .into_iter()
            .filter(|(_, _, color)| *color != HEADER_FILL)
            .collect()
    }

    #[test]
    fn header_shows_padded_number_and_date() {
        let mut record = acme();
        record.invoice_number = "INV-7".to_string();
        let page = template().render(&record);

        assert!(page.contains_text("NO. 000007"));
        assert!(page.contains_text("INVOICE"));
        assert!(page.contains_text("Date: 15 January, 2024"));
        assert!(page.contains_text("YOUR"));
        assert!(page.contains_text("LOGO"));
    }

    #[test]
    fn unparseable_number_falls_back() {
        let mut record = acme();
        record.invoice_number = "DRAFT".to_string();
        assert!(template().render(&record).contains_text("NO. 000001"));
    }

    #[test]
    fn one_row_group_per_item_with_alternating_tint() {
        let record = with_items(5);
        let page = template().render(&record);

        let rows = row_rects(&page);
        assert_eq!(rows.len(), 5);
        for (i, (_, _, color)) in rows.iter().enumerate() {
            assert_eq!(*color, ROW_TINTS[i % 2]);
        }
        // Rows run down the page in input order
        for pair in rows.windows(2) {
            assert!(pair[0].0 > pair[1].0);
        }

        let descriptions: Vec<&str> = page.texts().filter(|t| t.starts_with("Item ")).collect();
        assert_eq!(descriptions, vec!["Item 0", "Item 1", "Item 2", "Item 3", "Item 4"]);
    }

    #[test]
    fn amounts_are_recomputed_at_zero_decimals() {
        let page = template().render(&with_items(3));
        // 1 x 10.5, 2 x 20.5 and 3 x 30.5
        assert!(page.contains_text("11"));
        assert!(page.contains_text("41"));
        assert!(page.contains_text("92"));
        assert!(page.contains_text("143"));
        assert!(!page.contains_text("10"));
        assert!(page.contains_text("Quantity"));
        assert!(page.contains_text("3"));
    }

    #[test]
    fn total_is_raw_sum_without_tax_line() {
        let page = template().render(&acme());

        assert!(page.contains_text("Total"));
        assert!(page.contains_text("300"));
        assert!(!page.texts().any(|t| t.starts_with("Tax")));
        assert!(!page.contains_text("Subtotal"));
    }

    #[test]
    fn tax_can_be_enabled_by_configuration() {
        let mut settings = TemplateKind::Minimal.default_settings();
        settings.tax = TaxPolicy::STANDARD;
        let page = MinimalTemplate::new(settings).render(&acme());

        assert!(page.contains_text("Subtotal"));
        assert!(page.contains_text("Tax (10%)"));
        assert!(page.contains_text("30"));
        assert!(page.contains_text("330"));
    }

    #[test]
    fn blank_optional_fields_emit_nothing_and_collapse() {
        let mut without = acme();
        without.client_address = Some("  \n ".to_string());
        let mut with_email = acme();
        with_email.client_email = Some("billing@acme.test".to_string());

        let page_without = template().render(&without);
        let page_with = template().render(&with_email);

        assert_eq!(page_with.commands.len(), page_without.commands.len() + 1);
        assert!(page_with.contains_text("billing@acme.test"));

        let header_without = baseline_of(&page_without, "Item").unwrap();
        let header_with = baseline_of(&page_with, "Item").unwrap();
        assert!((header_with - header_without - 15.0).abs() < 0.001);
    }

    #[test]
    fn address_lines_are_drawn_one_per_row() {
        let mut record = acme();
        record.from_address = Some("1 Main Street\n\nSpringfield".to_string());
        let page = template().render(&record);

        let first = baseline_of(&page, "1 Main Street").unwrap();
        let second = baseline_of(&page, "Springfield").unwrap();
        assert!((second - first - 15.0).abs() < 0.001);
        // name at 315, one name row of 20 below it
        assert!((first - 335.0).abs() < 0.001);
    }

    #[test]
    fn long_description_grows_its_row() {
        let mut record = with_items(2);
        record.items[0].description =
            "A very long description that certainly needs more than one line in the column".to_string();
        let page = template().render(&record);

        let rows = row_rects(&page);
        assert!(rows[0].1 > ROW_HEIGHT);
        assert!((rows[1].1 - ROW_HEIGHT).abs() < 0.001);
        // second row starts right where the first one ends
        assert!((rows[0].0 - (rows[1].0 + rows[1].1)).abs() < 0.001);
    }

    #[test]
    fn waves_are_filled_then_stroked() {
        let page = template().render(&acme());

        let strokes: Vec<&DrawCommand> = page
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { thickness, .. } if *thickness > 2.0))
            .collect();
        let samples = (page.width / WAVE_SAMPLE_STEP).floor() as usize;
        assert_eq!(strokes.len(), samples * 2);

        let strips = rects_of_width(&page, WAVE_STRIP_WIDTH);
        assert_eq!(strips.len(), 2 * (page.width / WAVE_STRIP_WIDTH).ceil() as usize);
        // every strip reaches the bottom edge
        assert!(strips.iter().all(|(y, _, _)| y.abs() < 0.001));

        // Wave commands are painted last
        assert!(matches!(page.commands.last(), Some(DrawCommand::Line { .. })));
    }
}
