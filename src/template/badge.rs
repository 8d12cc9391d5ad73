//! Coloured layout: header band, circular number badge, shaded client box,
//! taxed totals in a filled box and a serif footer.

use crate::draw::{Canvas, Color, Page, TextAlign, TextStyle};
use crate::font_metrics::FontFace;
use crate::format;
use crate::invoice::{InvoiceItem, InvoiceRecord};

use super::{draw_party, row_height, tax_label, InvoiceTemplate, PartyLayout, TemplateSettings};

const LINE_HEIGHT: f32 = 1.2;

const PRIMARY: Color = Color::rgb(0.2, 0.4, 0.6);
const ACCENT: Color = Color::rgb(0.8, 0.3, 0.3);
const LIGHT: Color = Color::gray(0.95);
const DARK: Color = Color::gray(0.3);
const MEDIUM: Color = Color::gray(0.6);

pub(crate) const ROW_TINTS: [Color; 2] = [Color::WHITE, LIGHT];

const HEADER_HEIGHT: f32 = 120.0;

const BADGE_CENTER: (f32, f32) = (80.0, 180.0);
const BADGE_RADIUS: f32 = 40.0;
const BADGE_RING: f32 = 3.0;

const FROM_TOP: f32 = 150.0;
const CLIENT_MIN_TOP: f32 = 240.0;
const CLIENT_BOX_X: f32 = 150.0;
const CLIENT_BOX_WIDTH: f32 = 300.0;
const CLIENT_BOX_MIN_HEIGHT: f32 = 100.0;
const PARTY_TEXT_WIDTH: f32 = 260.0;

const TABLE_MIN_TOP: f32 = 360.0;
const TABLE_X: f32 = 50.0;
const TABLE_WIDTH: f32 = 530.0;
/// Left edge of the description, then the right edges of quantity, price
/// and amount
const COLUMNS: [f32; 4] = [50.0, 330.0, 430.0, 530.0];
const HEADER_ROW_HEIGHT: f32 = 30.0;
const ROW_HEIGHT: f32 = 30.0;
const ROW_BASELINE: f32 = 20.0;
const DESCRIPTION_WIDTH: f32 = 260.0;

const TOTALS_LABEL_X: f32 = 480.0;
const TOTALS_VALUE_X: f32 = TABLE_X + TABLE_WIDTH - 10.0;
const TOTAL_BOX_X: f32 = 350.0;

#[derive(Debug, Clone)]
pub struct BadgeTemplate {
    settings: TemplateSettings,
}

impl BadgeTemplate {
    pub fn new(settings: TemplateSettings) -> Self {
        BadgeTemplate { settings }
    }

    fn header(&self, canvas: &mut Canvas, record: &InvoiceRecord) {
        let width = canvas.width();
        canvas.rect(0.0, 0.0, width, HEADER_HEIGHT, PRIMARY);
        canvas.rect(width - 200.0, 60.0, 200.0, 30.0, ACCENT);

        let centered = TextStyle::new(FontFace::HelveticaBold, 36.0)
            .color(Color::WHITE)
            .align(TextAlign::Center);
        canvas.text("INVOICE", width / 2.0, 50.0, &centered);

        let date = format::month_first_date(record.date);
        let subtitle = TextStyle::new(FontFace::Helvetica, 12.0)
            .color(Color::WHITE)
            .align(TextAlign::Center);
        canvas.text(&date, width / 2.0, 90.0, &subtitle);
    }

    /// Accent ring with the padded invoice number inside.
    fn badge(&self, canvas: &mut Canvas, record: &InvoiceRecord) {
        let (cx, cy) = BADGE_CENTER;
        canvas.circle(cx, cy, BADGE_RADIUS, ACCENT);
        canvas.circle(cx, cy, BADGE_RADIUS - BADGE_RING, Color::WHITE);

        let hash = TextStyle::new(FontFace::Helvetica, 12.0)
            .color(ACCENT)
            .align(TextAlign::Center);
        canvas.text("#", cx, cy - 15.0, &hash);

        let number = TextStyle::new(FontFace::HelveticaBold, 11.0)
            .color(ACCENT)
            .align(TextAlign::Center)
            .max_width(60.0);
        canvas.text(&format::badge_number(&record.invoice_number), cx, cy + 5.0, &number);
    }

    /// Sender block, then the shaded client box below it. Returns the bottom
    /// of the client box.
    fn parties(&self, canvas: &mut Canvas, record: &InvoiceRecord) -> f32 {
        let from_end = draw_party(canvas, "FROM", &record.sender(), &party_layout(), FROM_TOP);

        let client_top = CLIENT_MIN_TOP.max(from_end + 20.0);
        let mark = canvas.mark();
        let client_end = draw_party(canvas, "BILL TO", &record.client(), &party_layout(), client_top);

        let box_top = client_top - 15.0;
        let box_height = CLIENT_BOX_MIN_HEIGHT.max(client_end - client_top + 15.0);
        canvas.rect_behind(mark, CLIENT_BOX_X, box_top, CLIENT_BOX_WIDTH, box_height, LIGHT);
        box_top + box_height
    }

    fn items_table(&self, canvas: &mut Canvas, items: &[InvoiceItem], top: f32) -> f32 {
        canvas.rect(TABLE_X, top, TABLE_WIDTH, HEADER_ROW_HEIGHT, PRIMARY);
        let heading = TextStyle::new(FontFace::HelveticaBold, 12.0).color(Color::WHITE);
        let labels = ["DESCRIPTION", "QTY", "PRICE", "AMOUNT"];
        canvas.text(labels[0], COLUMNS[0] + 10.0, top + ROW_BASELINE, &heading);
        for (label, x) in labels.iter().zip(COLUMNS).skip(1) {
            canvas.text(label, x, top + ROW_BASELINE, &heading.align(TextAlign::Right));
        }

        let description = TextStyle::new(FontFace::Helvetica, 10.0)
            .color(DARK)
            .max_width(DESCRIPTION_WIDTH);
        let cell = TextStyle::new(FontFace::Helvetica, 10.0)
            .color(DARK)
            .align(TextAlign::Right);
        let amount = TextStyle::new(FontFace::HelveticaBold, 10.0)
            .color(DARK)
            .align(TextAlign::Right);
        let mut y = top + HEADER_ROW_HEIGHT;

        for (index, item) in items.iter().enumerate() {
            let height = row_height(canvas, &item.description, &description, ROW_HEIGHT);
            canvas.rect(TABLE_X, y, TABLE_WIDTH, height, ROW_TINTS[index % 2]);

            let baseline = y + ROW_BASELINE;
            canvas.text(&item.description, COLUMNS[0] + 10.0, baseline, &description);
            canvas.text(&format::quantity(item.quantity), COLUMNS[1], baseline, &cell);
            canvas.text(&self.settings.money(item.price), COLUMNS[2], baseline, &cell);
            canvas.text(&self.settings.money(item.amount()), COLUMNS[3], baseline, &amount);

            y += height;
        }
        y
    }

    fn totals(&self, canvas: &mut Canvas, items: &[InvoiceItem], table_end: f32) {
        let totals = self.settings.totals(items);
        let label = TextStyle::new(FontFace::Helvetica, 12.0)
            .color(DARK)
            .align(TextAlign::Right);
        let value = label;

        let mut y = table_end + 25.0;
        canvas.text("Subtotal:", TOTALS_LABEL_X, y, &label);
        canvas.text(&self.settings.money(totals.subtotal), TOTALS_VALUE_X, y, &value);

        if let (Some(tax), Some(rate)) = (totals.tax, self.settings.tax.rate()) {
            y += 20.0;
            canvas.text(&format!("{}:", tax_label(rate)), TOTALS_LABEL_X, y, &label);
            canvas.text(&self.settings.money(tax), TOTALS_VALUE_X, y, &value);
        }

        y += 35.0;
        let box_width = TABLE_X + TABLE_WIDTH - TOTAL_BOX_X;
        canvas.rect(TOTAL_BOX_X, y - 20.0, box_width, 30.0, PRIMARY);
        let total = TextStyle::new(FontFace::HelveticaBold, 14.0)
            .color(Color::WHITE)
            .align(TextAlign::Right);
        canvas.text("TOTAL:", TOTALS_LABEL_X, y, &total);
        canvas.text(&self.settings.money(totals.total), TOTALS_VALUE_X, y, &total);
    }

    fn footer(&self, canvas: &mut Canvas) {
        let (width, height) = (canvas.width(), canvas.height());
        canvas.line(50.0, height - 70.0, width - 50.0, height - 70.0, 1.0, MEDIUM);

        let due = TextStyle::new(FontFace::Helvetica, 10.0)
            .color(MEDIUM)
            .align(TextAlign::Center);
        canvas.text("Payment due within 30 days", width / 2.0, height - 45.0, &due);

        let thanks = TextStyle::new(FontFace::TimesItalic, 12.0)
            .color(PRIMARY)
            .align(TextAlign::Center);
        canvas.text("Thank you for your business", width / 2.0, height - 30.0, &thanks);

        let page = TextStyle::new(FontFace::Helvetica, 8.0)
            .color(MEDIUM)
            .align(TextAlign::Right);
        canvas.text("Page 1 of 1", width - 50.0, height - 30.0, &page);
    }
}

fn party_layout() -> PartyLayout {
    PartyLayout {
        label_x: 165.0,
        name_x: 190.0,
        detail_x: 170.0,
        label: TextStyle::new(FontFace::Helvetica, 10.0).color(MEDIUM),
        name: TextStyle::new(FontFace::HelveticaBold, 18.0)
            .color(PRIMARY)
            .max_width(PARTY_TEXT_WIDTH),
        detail: TextStyle::new(FontFace::Helvetica, 10.0)
            .color(DARK)
            .max_width(PARTY_TEXT_WIDTH),
        name_offset: 20.0,
        name_row: 20.0,
        detail_row: 15.0,
    }
}

impl InvoiceTemplate for BadgeTemplate {
    fn name(&self) -> &'static str {
        "badge"
    }

    fn settings(&self) -> &TemplateSettings {
        &self.settings
    }

    fn render(&self, record: &InvoiceRecord) -> Page {
        let mut canvas = Canvas::a4(LINE_HEIGHT);

        self.header(&mut canvas, record);
        self.badge(&mut canvas, record);
        let parties_end = self.parties(&mut canvas, record);
        let table_top = TABLE_MIN_TOP.max(parties_end + 35.0);
        let table_end = self.items_table(&mut canvas, &record.items, table_top);
        self.totals(&mut canvas, &record.items, table_end);
        self.footer(&mut canvas);

        canvas.into_page()
    }
}
