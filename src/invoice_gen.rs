use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point};

use crate::billing::TAX_RATE;
use crate::error::{Error, Result};
use crate::models::{Client, Invoice, LineItem, Settings};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_X: f32 = 18.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const AMOUNT_RIGHT: f32 = PAGE_W - MARGIN_X;
const ROW_H: f32 = 7.0;

/// An invoice with everything needed to print it.
pub struct InvoiceDocument<'a> {
    pub invoice: &'a Invoice,
    pub client: &'a Client,
    pub settings: &'a Settings,
    pub items: Vec<LineItem>,
}

impl<'a> InvoiceDocument<'a> {
    /// Parses the invoice's stored items; malformed item text is an error.
    pub fn new(invoice: &'a Invoice, client: &'a Client, settings: &'a Settings) -> Result<Self> {
        Ok(Self {
            invoice,
            client,
            settings,
            items: invoice.line_items()?,
        })
    }

    pub fn filename(&self) -> String {
        format!("invoice_{}.pdf", self.invoice.id)
    }

    /// Lay the invoice out on A4 pages and return the PDF bytes
    pub fn render_pdf(&self) -> Result<Vec<u8>> {
        let title = format!("Invoice #{}", self.invoice.id);
        let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");

        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;

        let mut pen = Pen {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_H - MARGIN_TOP,
        };

        // Business header
        pen.text(&self.settings.business_name, 18.0, MARGIN_X, &bold);
        pen.advance(8.0);
        for line in [&self.settings.address, &self.settings.phone, &self.settings.email] {
            pen.text(line, 10.0, MARGIN_X, &regular);
            pen.advance(5.0);
        }

        pen.advance(6.0);
        pen.text("INVOICE", 22.0, MARGIN_X, &bold);
        pen.advance(9.0);

        let status = if self.invoice.paid { "PAID" } else { "UNPAID" };
        pen.text(&format!("Invoice #{}", self.invoice.id), 10.0, MARGIN_X, &regular);
        pen.text_right(status, 12.0, AMOUNT_RIGHT, &bold);
        pen.advance(5.0);
        pen.text(
            &format!("Date: {}", self.invoice.date_created.format("%m/%d/%Y")),
            10.0,
            MARGIN_X,
            &regular,
        );
        pen.advance(10.0);

        // Bill to
        pen.text("Bill to", 11.0, MARGIN_X, &bold);
        pen.advance(6.0);
        for line in [&self.client.name, &self.client.address, &self.client.phone, &self.client.email] {
            if !line.is_empty() {
                pen.text(line, 10.0, MARGIN_X, &regular);
                pen.advance(5.0);
            }
        }

        pen.advance(6.0);
        pen.text("Description", 11.0, MARGIN_X, &bold);
        pen.text_right("Amount", 11.0, AMOUNT_RIGHT, &bold);
        pen.advance(2.5);
        pen.rule();
        pen.advance(ROW_H - 2.5);

        for item in &self.items {
            pen.ensure_room(ROW_H);
            pen.text(&item.description, 10.0, MARGIN_X, &regular);
            pen.text_right(&money(item.amount), 10.0, AMOUNT_RIGHT, &regular);
            pen.advance(ROW_H);
        }

        pen.ensure_room(ROW_H * 4.0);
        pen.advance(-ROW_H + 2.5);
        pen.rule();
        pen.advance(ROW_H);

        let tax_label = format!("Tax ({:.0}%)", TAX_RATE * 100.0);
        let totals = [
            ("Subtotal", self.invoice.subtotal, &regular),
            (tax_label.as_str(), self.invoice.tax, &regular),
            ("Total", self.invoice.total, &bold),
        ];
        for (label, value, font) in totals {
            pen.text(label, 11.0, AMOUNT_RIGHT - 70.0, font);
            pen.text_right(&money(value), 11.0, AMOUNT_RIGHT, font);
            pen.advance(ROW_H);
        }

        let mut writer = BufWriter::new(Vec::<u8>::new());
        doc.save(&mut writer).map_err(pdf_err)?;
        let bytes = writer.into_inner().map_err(pdf_err)?;

        Ok(bytes)
    }
}

/// Current layer plus a cursor moving down the page
struct Pen<'d> {
    doc: &'d PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl Pen<'_> {
    fn text(&self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    /// Builtin fonts expose no metrics here, so width is estimated from the glyph count.
    fn text_right(&self, text: &str, size: f32, x_right: f32, font: &IndirectFontRef) {
        let width = text.chars().count() as f32 * size * 0.19;
        self.text(text, size, (x_right - width).max(MARGIN_X), font);
    }

    fn rule(&self) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_X), Mm(self.y)), false),
                (Point::new(Mm(PAGE_W - MARGIN_X), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed >= MARGIN_BOTTOM {
            return;
        }
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN_TOP;
    }
}

fn money(value: f64) -> String {
    format!("${value:.2}")
}

fn pdf_err(err: impl std::fmt::Display) -> Error {
    Error::Pdf(err.to_string())
}
