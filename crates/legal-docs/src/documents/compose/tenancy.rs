use super::{paragraph, DocumentBuilder};
use crate::documents::derived::{
    additional_terms_number, contact_suffix, has_caution_fee, inline_or_blank,
};
use crate::documents::domain::{DocumentKind, TenancyRecord};
use crate::documents::format::{
    calculate_end_date, format_currency, format_date, format_date_with_ordinal, words_for_amount,
    INLINE_BLANK,
};
use crate::documents::ir::{Block, DocumentIr, SignatoryGroup};

const GOVERNING_LAW: &str = "This Agreement shall be governed by and construed in accordance with the Rent Act, 1963 (Act 220) and other applicable laws of the Republic of Ghana.";

pub fn compose_tenancy(record: &TenancyRecord) -> DocumentIr {
    let mut doc = DocumentBuilder::new(DocumentKind::Tenancy);
    let title = record.landlord_title.label();
    let disclose = record.include_phone_numbers;

    doc.preamble(format!(
        "This Tenancy Agreement is made on this {}, between {}{} (hereinafter the \"{title}\") and {}{} (hereinafter the \"Tenant\").",
        format_date_with_ordinal(&record.date_of_agreement),
        inline_or_blank(&record.landlord_name),
        contact_suffix(&record.landlord_name, &record.landlord_phone, disclose),
        inline_or_blank(&record.tenant_name),
        contact_suffix(&record.tenant_name, &record.tenant_phone, disclose),
    ));

    // property details, payment status and payment note stay on the record
    // for the form only; the agreement text never states them
    doc.numbered(
        "PROPERTY DESCRIPTION",
        vec![paragraph(format!(
            "The {title} agrees to let and the Tenant agrees to take the property described as: {} located at {}.",
            record.property_type.label(),
            inline_or_blank(&record.property_location),
        ))],
    );

    doc.numbered("TERM OF TENANCY", vec![term_paragraph(record)]);

    doc.numbered("RENT", vec![rent_paragraph(record)]);

    if has_caution_fee(record.caution_fee) {
        doc.numbered(
            "CAUTION FEE",
            vec![paragraph(format!(
                "A refundable caution fee of {} ({} Ghana Cedis) has been paid by the Tenant to the {title}.",
                format_currency(record.caution_fee),
                words_for_amount(record.caution_fee),
            ))],
        );
    }

    let clauses: Vec<Block> = record
        .custom_clauses
        .iter()
        .map(|clause| clause.trim())
        .filter(|clause| !clause.is_empty())
        .zip(1..)
        .map(|(text, number)| Block::Clause {
            number,
            text: text.to_string(),
        })
        .collect();
    if !clauses.is_empty() {
        let number = doc.numbered("ADDITIONAL TERMS", clauses);
        debug_assert_eq!(number, additional_terms_number(record.caution_fee));
    }

    doc.unnumbered("GOVERNING LAW", vec![paragraph(GOVERNING_LAW)]);

    doc.signatory(
        SignatoryGroup::Parties,
        record.landlord_title.signature_role(),
        &record.landlord_name,
        &record.landlord_phone,
        disclose,
    );
    doc.signatory(
        SignatoryGroup::Parties,
        "TENANT",
        &record.tenant_name,
        &record.tenant_phone,
        disclose,
    );
    for (index, witness) in record.witnesses().iter().enumerate() {
        doc.signatory(
            SignatoryGroup::Witnesses,
            format!("Witness {}", index + 1),
            witness.name,
            witness.phone,
            disclose,
        );
    }

    doc.finish()
}

fn term_paragraph(record: &TenancyRecord) -> Block {
    let start = format_date(&record.start_date);
    let end = calculate_end_date(
        &record.start_date,
        record.duration_value,
        record.duration_unit,
    );

    paragraph(format!(
        "The term of this tenancy shall be for a period of {} {}, commencing from {} and ending on {}.",
        record.duration_value,
        record.duration_unit.noun(record.duration_value),
        or_blank(start),
        or_blank(end),
    ))
}

fn rent_paragraph(record: &TenancyRecord) -> Block {
    let total = record.total_rent();
    paragraph(format!(
        "The {} rent for the property is {} ({} Ghana Cedis). The total rent for the entire period is {} ({} Ghana Cedis).",
        record.rent_frequency.adjective(),
        format_currency(record.rent_amount),
        words_for_amount(record.rent_amount),
        format_currency(total),
        words_for_amount(total),
    ))
}

fn or_blank(value: String) -> String {
    if value.is_empty() {
        INLINE_BLANK.to_string()
    } else {
        value
    }
}
