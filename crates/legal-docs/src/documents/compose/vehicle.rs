use super::{paragraph, DocumentBuilder};
use crate::documents::derived::inline_or_blank;
use crate::documents::domain::{DocumentKind, VehicleTransferRecord};
use crate::documents::format::{
    format_currency, format_date_with_ordinal, format_deadline, words_for_amount,
};
use crate::documents::ir::{DocumentIr, SignatoryGroup};

const GOVERNING_LAW: &str = "This Agreement shall be governed by the laws of the Republic of Ghana.";
const DEFAULT_CLAUSE: &str = "If the Buyer fails to pay the outstanding balance within the agreed period, the Seller reserves the right to withhold all vehicle documents and may take any lawful steps necessary to recover either the vehicle or the amount owed.";

pub fn compose_vehicle_transfer(record: &VehicleTransferRecord) -> DocumentIr {
    let mut doc = DocumentBuilder::new(DocumentKind::VehicleTransfer);
    let balance = record.outstanding_balance();
    let owing = balance > 0.0;
    let disclose = record.include_phone_numbers;

    doc.preamble(format!(
        "This Vehicle Transfer Agreement is made on this {}, between {} of {} (\"the Seller\") and {} of {} (\"the Buyer\").",
        format_date_with_ordinal(&record.date_of_agreement),
        inline_or_blank(&record.seller_name),
        inline_or_blank(&record.seller_location),
        inline_or_blank(&record.buyer_name),
        inline_or_blank(&record.buyer_location),
    ));

    doc.numbered(
        "VEHICLE DETAILS",
        vec![paragraph(format!(
            "The Seller agrees to sell to the Buyer a {} {} {} with registration number {}. The Buyer confirms that he/she has inspected the vehicle and accepts it in its current condition.",
            inline_or_blank(&record.vehicle_color),
            inline_or_blank(&record.vehicle_make),
            inline_or_blank(&record.vehicle_model),
            inline_or_blank(&record.registration_number),
        ))],
    );

    let payment_terms = if record.amount_paid > 0.0 {
        format!(
            "The Buyer has made a part payment of {} ({} Ghana Cedis), leaving an outstanding balance of {} ({} Ghana Cedis). The Buyer agrees to pay the remaining amount by {}.",
            format_currency(record.amount_paid),
            words_for_amount(record.amount_paid),
            format_currency(balance),
            words_for_amount(balance),
            format_deadline(&record.payment_deadline),
        )
    } else {
        "Payment shall be made in full upon signing of this Agreement.".to_string()
    };
    doc.numbered(
        "PURCHASE PRICE AND PAYMENT TERMS",
        vec![paragraph(format!(
            "The total agreed purchase price of the vehicle is {} ({} Ghana Cedis). {payment_terms}",
            format_currency(record.total_price),
            words_for_amount(record.total_price),
        ))],
    );

    let handover = if owing {
        "only after the Buyer has paid the outstanding balance in full."
    } else {
        "upon signing of this Agreement."
    };
    doc.numbered(
        "TRANSFER OF DOCUMENTS",
        vec![paragraph(format!(
            "The Seller shall hand over all relevant documents\u{2014}including the registration certificate, insurance papers, and any other ownership documents\u{2014}{handover}"
        ))],
    );

    let ownership = if owing {
        "only after complete payment of the total purchase price. Until then, the Seller remains the lawful owner of the vehicle."
    } else {
        "upon signing of this Agreement and receipt of full payment."
    };
    doc.numbered(
        "OWNERSHIP AND RESPONSIBILITY",
        vec![paragraph(format!(
            "Full ownership and legal rights to the vehicle will transfer to the Buyer {ownership}"
        ))],
    );

    if owing {
        doc.numbered("DEFAULT CLAUSE", vec![paragraph(DEFAULT_CLAUSE)]);
    }

    doc.unnumbered("GOVERNING LAW", vec![paragraph(GOVERNING_LAW)]);

    doc.signatory(
        SignatoryGroup::Parties,
        "Seller",
        &record.seller_name,
        &record.seller_phone,
        disclose,
    );
    doc.signatory(
        SignatoryGroup::Parties,
        "Buyer",
        &record.buyer_name,
        &record.buyer_phone,
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
