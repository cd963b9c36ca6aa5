use crate::{error::SantaResult, include_res, links::LinkCodec, pairs::ResolvedPairing, res};

pub const CSV_FILENAME: &str = "secret-santa-assignments.csv";
pub const POSTCARDS_FILENAME: &str = "secret-santa-postcards.html";

/// Two-column `Giver,Receiver` table, one row per pairing, in the order given.
pub fn pairs_csv(pairings: &[ResolvedPairing]) -> String {
    let mut csv = String::from("Giver,Receiver\r\n");
    for ResolvedPairing { giver, receiver, .. } in pairings {
        csv += &csv_field(giver);
        csv.push(',');
        csv += &csv_field(receiver);
        csv += "\r\n";
    }
    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// A printable page with one card per giver, each carrying that giver's link.
///
/// Cards never name the receiver; the link is the only way to see it.
pub fn postcards_html(
    pairings: &[ResolvedPairing],
    codec: &LinkCodec,
    instructions: Option<&str>,
) -> SantaResult<String> {
    let notes = instructions.map(res::text_block).unwrap_or_default();

    let mut cards = String::new();
    for ResolvedPairing { giver, receiver, hint } in pairings {
        let link = codec.encode(giver, receiver, hint.as_deref(), instructions)?;
        let giver = res::escape_html(giver);
        let link = res::escape_html(link.as_str());
        cards += &res::fill(
            include_res!(str, "/pages/postcard.html"),
            &[
                ("giver", giver.as_str()),
                ("link", link.as_str()),
                ("instructions", notes.as_str()),
            ],
        );
    }

    Ok(res::fill(include_res!(str, "/pages/postcards.html"), &[("cards", cards.as_str())]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(giver: &str, receiver: &str) -> ResolvedPairing {
        ResolvedPairing { giver: giver.into(), receiver: receiver.into(), hint: Some("never exported".into()) }
    }

    #[test]
    fn writes_header_and_rows() {
        let csv = pairs_csv(&[row("Alice", "Bob"), row("Bob", "Alice")]);
        assert_eq!(csv, "Giver,Receiver\r\nAlice,Bob\r\nBob,Alice\r\n");
    }

    #[test]
    fn quotes_awkward_names() {
        let csv = pairs_csv(&[row("Smith, Jo", "Bob \"The Builder\"")]);
        assert_eq!(csv, "Giver,Receiver\r\n\"Smith, Jo\",\"Bob \"\"The Builder\"\"\"\r\n");
    }

    fn codec() -> LinkCodec {
        LinkCodec::new(&url::Url::parse("http://santa.test").unwrap()).unwrap()
    }

    #[test]
    fn postcards_carry_working_links() {
        let html = postcards_html(&[row("Alice", "Bob"), row("Bob", "Alice")], &codec(), Some("Budget 20")).unwrap();

        assert_eq!(html.matches("class=\"postcard\"").count(), 2);
        assert!(html.contains("For Alice"));
        assert!(html.contains("<p class=\"text\">Budget 20</p>"));
        assert!(!html.contains("never exported"));

        let start = html.find("href=\"").unwrap() + "href=\"".len();
        let end = start + html[start..].find('"').unwrap();
        let link = url::Url::parse(&html[start..end].replace("&amp;", "&")).unwrap();
        let pairing = LinkCodec::decode(&crate::links::LinkParams::from_url(&link)).unwrap();
        assert_eq!(pairing.giver, "Alice");
        assert_eq!(pairing.receiver.name, "Bob");
        assert_eq!(pairing.instructions.as_deref(), Some("Budget 20"));
    }

    #[test]
    fn postcards_escape_names_and_hide_receivers() {
        let html = postcards_html(&[row("<b>Al</b>", "Secret Bob")], &codec(), None).unwrap();

        assert!(html.contains("For &lt;b&gt;Al&lt;/b&gt;"));
        assert!(!html.contains("Secret Bob"));
        assert!(!html.contains("{instructions}"));
        assert!(!html.contains("class=\"text\""));
    }
}
