//! Load RFC 822 (`.eml`) messages into [`RawEmail`] records.

use chrono::DateTime;
use mailparse::{MailAddr, MailHeaderMap, ParsedMail, addrparse_header, dateparse, parse_mail};
use paymetrics_core::{BodyPart, MimeHint, RawEmail, Result};

fn collect_text_parts(mail: &ParsedMail, out: &mut Vec<BodyPart>) {
    let mime = mail.ctype.mimetype.to_ascii_lowercase();
    if mime == "text/plain" || mime == "text/html" {
        if let Ok(body) = mail.get_body() {
            out.push(BodyPart::new(mime, body));
        }
    }
    for part in &mail.subparts {
        collect_text_parts(part, out);
    }
}

fn sender_address(mail: &ParsedMail) -> String {
    let Some(header) = mail.headers.get_first_header("From") else {
        return String::new();
    };
    let Ok(list) = addrparse_header(header) else {
        return header.get_value();
    };
    list.iter()
        .find_map(|addr| match addr {
            MailAddr::Single(info) => Some(info.addr.clone()),
            MailAddr::Group(group) => group.addrs.first().map(|info| info.addr.clone()),
        })
        .unwrap_or_else(|| header.get_value())
}

/// Parse one message. `fallback_id` is used when there is no Message-ID header.
pub fn load_eml(bytes: &[u8], fallback_id: &str) -> Result<RawEmail> {
    let mail = parse_mail(bytes)?;

    let id = mail
        .headers
        .get_first_value("Message-ID")
        .map(|v| v.trim().trim_start_matches('<').trim_end_matches('>').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback_id.to_string());
    let subject = mail.headers.get_first_value("Subject").unwrap_or_default();
    let received_at = mail
        .headers
        .get_first_value("Date")
        .and_then(|d| dateparse(&d).ok())
        .and_then(|ts| DateTime::from_timestamp(ts, 0));

    let mut parts = Vec::new();
    collect_text_parts(&mail, &mut parts);

    // Richest single payload for consumers that only read `body`
    let (body, mime_hint) = parts
        .iter()
        .find(|p| p.hint() == MimeHint::Html)
        .or_else(|| parts.first())
        .map(|p| (p.content.clone(), p.hint()))
        .unwrap_or_default();

    Ok(RawEmail {
        id,
        sender: sender_address(&mail),
        subject,
        body,
        received_at,
        mime_hint,
        parts,
    })
}
