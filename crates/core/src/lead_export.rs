//! CSV and email formatting for sharing a single lead outside the system.

use crate::types::Timestamp;

/// Column headers, in output order.
pub const CSV_HEADERS: &[&str] = &[
    "First Name",
    "Last Name",
    "Business Name",
    "Phone",
    "Email Address",
    "Zip Code",
    "Credit Processing Volume",
    "Notes",
    "Agent Name",
    "Agent Email",
    "Submission Date",
    "Submission Time",
];

/// Borrowed view of the lead fields that go into an export.
#[derive(Debug, Clone, Copy)]
pub struct LeadExport<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub business_name: &'a str,
    pub phone: &'a str,
    pub email_address: &'a str,
    pub zip_code: &'a str,
    pub credit_processing_volume: &'a str,
    pub notes: &'a str,
    pub agent_name: &'a str,
    pub agent_email: &'a str,
    pub submitted_at: Timestamp,
}

/// Quote a field and double any embedded quotes.
pub fn quote_csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render a header row plus one data row. Every data field is quoted; the
/// submission timestamp is split into UTC date and time columns.
pub fn to_csv(lead: &LeadExport<'_>) -> String {
    let date = lead.submitted_at.format("%Y-%m-%d").to_string();
    let time = lead.submitted_at.format("%H:%M:%S").to_string();
    let row = [
        lead.first_name,
        lead.last_name,
        lead.business_name,
        lead.phone,
        lead.email_address,
        lead.zip_code,
        lead.credit_processing_volume,
        lead.notes,
        lead.agent_name,
        lead.agent_email,
        date.as_str(),
        time.as_str(),
    ]
    .iter()
    .map(|field| quote_csv_field(field))
    .collect::<Vec<_>>()
    .join(",");

    format!("{}\n{row}", CSV_HEADERS.join(","))
}

/// `lead_<First>_<Last>_<YYYY-MM-DD>_<HH-MM-SS>.csv`, with anything other
/// than ASCII letters and digits stripped from the names.
pub fn export_file_name(lead: &LeadExport<'_>) -> String {
    let clean = |s: &str| {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
    };
    format!(
        "lead_{}_{}_{}.csv",
        clean(lead.first_name),
        clean(lead.last_name),
        lead.submitted_at.format("%Y-%m-%d_%H-%M-%S")
    )
}

pub fn email_subject(lead: &LeadExport<'_>) -> String {
    format!(
        "New Lead Submission - {} {}",
        lead.first_name, lead.last_name
    )
}

/// Plain-text email body summarising the lead; the CSV goes as an attachment.
pub fn email_body(lead: &LeadExport<'_>) -> String {
    format!(
        "A new lead has been submitted by {agent}.\n\n\
         Lead Details:\n\
         - Name: {first} {last}\n\
         - Business: {business}\n\
         - Phone: {phone}\n\
         - Email: {email}\n\
         - Zip Code: {zip}\n\
         - Processing Volume: {volume}\n\
         - Notes: {notes}\n\n\
         Agent: {agent} ({agent_email})\n\
         Submission Date: {submitted}\n",
        agent = lead.agent_name,
        first = lead.first_name,
        last = lead.last_name,
        business = lead.business_name,
        phone = lead.phone,
        email = lead.email_address,
        zip = lead.zip_code,
        volume = lead.credit_processing_volume,
        notes = lead.notes,
        agent_email = lead.agent_email,
        submitted = lead.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
