use std::collections::HashMap;
use std::io::{Cursor, Read};

use legal_docs::documents::domain::{
    AgreementRecord, DurationUnit, LandlordTitle, PaymentStatus, RentFrequency, TenancyRecord,
    VehicleTransferRecord,
};
use legal_docs::documents::render::{render_docx, render_html, render_pdf, render_preview, HtmlOptions};
use legal_docs::documents::{compose, DocumentIr};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use regex::Regex;

fn html_text_lines(html: &str) -> Vec<String> {
    let element = Regex::new(r"<(h1|h2|p)(?: [^>]*)?>(.*?)</(?:h1|h2|p)>").expect("valid regex");
    element
        .captures_iter(html)
        .map(|captures| unescape_html(&captures[2]))
        .collect()
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}

fn docx_text_lines(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("docx is a zip");
    let mut document = String::new();
    archive
        .by_name("word/document.xml")
        .expect("document part")
        .read_to_string(&mut document)
        .expect("utf-8 document");

    let paragraph = Regex::new(r"<w:p>(.*?)</w:p>").expect("valid regex");
    let run_text = Regex::new(r#"<w:t xml:space="preserve">(.*?)</w:t>"#).expect("valid regex");
    paragraph
        .captures_iter(&document)
        .map(|paragraph| {
            run_text
                .captures_iter(&paragraph[1])
                .map(|run| unescape_xml(&run[1]))
                .collect::<String>()
        })
        .collect()
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Text shown by each `Tj`, decoded through the ToUnicode map of the font
/// selected at that point, in page order.
fn pdf_text_runs(bytes: &[u8]) -> Vec<String> {
    let document = Document::load_mem(bytes).expect("pdf parses");
    let mut runs = Vec::new();

    for page_id in document.get_pages().into_values() {
        let maps: HashMap<Vec<u8>, HashMap<u16, String>> = document
            .get_page_fonts(page_id)
            .into_iter()
            .map(|(name, font)| (name, to_unicode_map(&document, font)))
            .collect();
        let content = document.get_page_content(page_id).expect("page content");
        let operations = Content::decode(&content).expect("content decodes").operations;

        let mut current = None;
        for operation in &operations {
            match operation.operator.as_str() {
                "Tf" => {
                    let name = operation.operands[0].as_name().expect("font name");
                    current = Some(maps.get(name).expect("font has a ToUnicode map"));
                }
                "Tj" => {
                    let map = current.expect("font selected before text");
                    let shown = operation.operands[0].as_str().expect("string operand");
                    let text = shown
                        .chunks(2)
                        .map(|pair| {
                            let code = u16::from_be_bytes([pair[0], pair[1]]);
                            map.get(&code).cloned().expect("code mapped to unicode")
                        })
                        .collect();
                    runs.push(text);
                }
                _ => {}
            }
        }
    }
    runs
}

fn to_unicode_map(document: &Document, font: &Dictionary) -> HashMap<u16, String> {
    let cmap_id = font
        .get(b"ToUnicode")
        .and_then(Object::as_reference)
        .expect("ToUnicode reference");
    let stream = document
        .get_object(cmap_id)
        .and_then(Object::as_stream)
        .expect("ToUnicode stream");
    let cmap = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let cmap = String::from_utf8(cmap).expect("ascii cmap");

    let entry = Regex::new(r"<([0-9A-F]{4})> <([0-9A-F]+)>").expect("valid regex");
    entry
        .captures_iter(&cmap)
        .map(|captures| {
            let code = u16::from_str_radix(&captures[1], 16).expect("hex code");
            let units: Vec<u16> = captures[2]
                .as_bytes()
                .chunks(4)
                .map(|unit| {
                    let unit = std::str::from_utf8(unit).expect("ascii hex");
                    u16::from_str_radix(unit, 16).expect("hex unit")
                })
                .collect();
            let text = char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .expect("valid utf-16");
            (code, text)
        })
        .collect()
}

/// Checks that the wrapped PDF lines spell out `expected` in order. A
/// paragraph may be split over several lines; the space at each break is
/// not drawn.
fn assert_pdf_lines(runs: &[String], expected: &[String]) {
    let mut runs = runs.iter();
    // empty lines take up space but draw nothing
    for line in expected.iter().filter(|line| !line.is_empty()) {
        let mut rest = line.as_str();
        loop {
            let run = runs
                .next()
                .unwrap_or_else(|| panic!("pdf ended before {line:?}"));
            rest = rest
                .strip_prefix(run.as_str())
                .unwrap_or_else(|| panic!("pdf shows {run:?} where {rest:?} was expected"));
            rest = rest.strip_prefix(' ').unwrap_or(rest);
            if rest.is_empty() {
                break;
            }
        }
    }
    assert_eq!(runs.next(), None, "pdf shows text past the document end");
}

fn assert_formats_agree(ir: &DocumentIr) {
    let expected = ir.text_lines();

    let html = render_html(ir, HtmlOptions::default()).expect("html renders");
    assert_eq!(html_text_lines(&html), expected);

    let print = render_html(ir, HtmlOptions { auto_print: true }).expect("print renders");
    assert_eq!(html_text_lines(&print), expected);

    let docx = render_docx(ir).expect("docx renders");
    assert_eq!(docx_text_lines(&docx), expected);

    let preview = render_preview(ir);
    assert_eq!(preview.texts(), expected);

    let pdf = render_pdf(ir).expect("pdf renders");
    assert_pdf_lines(&pdf_text_runs(&pdf), &expected);
}

fn full_tenancy() -> TenancyRecord {
    TenancyRecord {
        date_of_agreement: "2025-06-03".to_string(),
        landlord_title: LandlordTitle::Landlady,
        landlord_name: "Akosua Mensah".to_string(),
        landlord_phone: "0244000001".to_string(),
        tenant_name: "Kwame \"KB\" Boateng".to_string(),
        tenant_phone: "0244000002".to_string(),
        property_location: "East Legon, Accra".to_string(),
        property_details: "Two rooms with a shared kitchen & bath.".to_string(),
        start_date: "2025-07-01".to_string(),
        duration_value: 18,
        duration_unit: DurationUnit::Months,
        rent_amount: 1_200.0,
        rent_frequency: RentFrequency::Year,
        caution_fee: 300.0,
        payment_status: PaymentStatus::PartPayment,
        payment_note: "Balance due by 1/9/2025.".to_string(),
        witness1_name: "Ama Serwaa".to_string(),
        witness1_phone: "0200000000".to_string(),
        witness2_name: "N/A".to_string(),
        witness2_phone: "0244000000".to_string(),
        include_phone_numbers: true,
        custom_clauses: vec![
            "The Tenant shall not keep any pets (dogs, cats, or other animals) on the premises."
                .to_string(),
            "Rent <arrears> attract a 5% surcharge.".to_string(),
        ],
        ..TenancyRecord::default()
    }
}

fn installment_vehicle() -> VehicleTransferRecord {
    VehicleTransferRecord {
        date_of_agreement: "2025-06-11".to_string(),
        seller_name: "Yaw Darko & Sons".to_string(),
        seller_location: "Kumasi".to_string(),
        seller_phone: "0244111111".to_string(),
        buyer_name: "Efua O'Neil".to_string(),
        buyer_location: "Takoradi".to_string(),
        buyer_phone: "0244222222".to_string(),
        vehicle_color: "Silver".to_string(),
        vehicle_make: "Toyota".to_string(),
        vehicle_model: "Corolla".to_string(),
        registration_number: "GR 1234-22".to_string(),
        total_price: 45_000.0,
        amount_paid: 20_000.0,
        payment_deadline: "2025-12-22".to_string(),
        include_phone_numbers: false,
        ..VehicleTransferRecord::default()
    }
}

#[test]
fn tenancy_formats_agree() {
    assert_formats_agree(&compose(&AgreementRecord::Tenancy(full_tenancy())));
    assert_formats_agree(&compose(&AgreementRecord::Tenancy(TenancyRecord::default())));
}

#[test]
fn vehicle_formats_agree() {
    assert_formats_agree(&compose(&AgreementRecord::VehicleTransfer(
        installment_vehicle(),
    )));

    let outright = VehicleTransferRecord {
        amount_paid: 0.0,
        ..installment_vehicle()
    };
    assert_formats_agree(&compose(&AgreementRecord::VehicleTransfer(outright)));
    assert_formats_agree(&compose(&AgreementRecord::VehicleTransfer(
        VehicleTransferRecord::default(),
    )));
}

#[test]
fn akan_names_and_cedi_amounts_survive_the_pdf() {
    let record = TenancyRecord {
        landlord_name: "Kwaku Ɔfori-Atta".to_string(),
        tenant_name: "Ɛfua Mensah".to_string(),
        custom_clauses: vec!["Water bills above GH₵50 are shared by ɔne and ɛna.".to_string()],
        ..full_tenancy()
    };
    let ir = compose(&AgreementRecord::Tenancy(record));
    assert_formats_agree(&ir);

    let shown = pdf_text_runs(&render_pdf(&ir).expect("pdf renders")).join(" ");
    assert!(shown.contains("Kwaku Ɔfori-Atta"));
    assert!(shown.contains("Ɛfua Mensah"));
    assert!(shown.contains("GH₵1,200.00"));
    assert!(!shown.contains('¢'));
    assert!(!shown.contains('?'));
}

#[test]
fn conditional_sections_match_across_formats() {
    let ir = compose(&AgreementRecord::Tenancy(full_tenancy()));
    let html = render_html(&ir, HtmlOptions::default()).expect("html renders");
    let lines = html_text_lines(&html);
    assert!(lines.contains(&"4. CAUTION FEE".to_string()));
    assert!(lines.contains(&"5. ADDITIONAL TERMS".to_string()));
    assert!(lines.contains(&"2. Rent <arrears> attract a 5% surcharge.".to_string()));
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 &<>'\"/.,ƆƐɔɛ₵-]{0,24}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn arbitrary_tenancy_text_survives_every_format(
        landlord in name_strategy(),
        tenant in name_strategy(),
        clauses in prop::collection::vec(name_strategy(), 0..4),
        caution in prop_oneof![Just(0.0f64), 1.0f64..5_000.0],
        disclose in any::<bool>(),
    ) {
        let record = TenancyRecord {
            landlord_name: landlord,
            tenant_name: tenant,
            tenant_phone: "0244000002".to_string(),
            custom_clauses: clauses,
            caution_fee: caution,
            include_phone_numbers: disclose,
            ..full_tenancy()
        };
        assert_formats_agree(&compose(&AgreementRecord::Tenancy(record)));
    }

    #[test]
    fn arbitrary_vehicle_text_survives_every_format(
        buyer in name_strategy(),
        total in 0.0f64..1.0e6,
        paid in 0.0f64..1.5e6,
    ) {
        let record = VehicleTransferRecord {
            buyer_name: buyer,
            total_price: total,
            amount_paid: paid,
            ..installment_vehicle()
        };
        assert_formats_agree(&compose(&AgreementRecord::VehicleTransfer(record)));
    }
}
