//! AutoCreate envelope codec.
//!
//! Yo!'s API speaks a single XML envelope in both directions. Outbound
//! requests wrap the API credentials and a method name around a flat
//! parameter set:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <AutoCreate>
//!   <Request>
//!     <APIUsername>...</APIUsername>
//!     <APIPassword>...</APIPassword>
//!     <Method>acdepositfunds</Method>
//!     <NonBlocking>TRUE</NonBlocking>
//!     ...
//!   </Request>
//! </AutoCreate>
//! ```
//!
//! Parameters with empty values are omitted entirely; the API rejects
//! payloads containing them. Responses come back in the same envelope
//! under `AutoCreate/Response`; a body without that element is a hard
//! parse failure, not a business error.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_decimal::Decimal;

/// A parse failure with enough context to diagnose the body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid AutoCreate response: {0}")]
pub struct EnvelopeError(pub String);

/// Typed view of an `AutoCreate/Response` element.
///
/// Every field is optional on the wire; the status normalizer and the
/// adapter decide what absence means per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YoResponse {
    /// Overall status text: `OK` or `ERROR`.
    pub status: Option<String>,

    /// Numeric status code. Zero is success, one is in-progress,
    /// negative values are provider-side rejections.
    pub status_code: Option<i64>,

    /// Free-text elaboration of the status code.
    pub status_message: Option<String>,

    /// Transaction state literal: `SUCCEEDED`, `FAILED`, `PENDING` or
    /// `INDETERMINATE`.
    pub transaction_status: Option<String>,

    /// Yo!'s own transaction reference.
    pub transaction_reference: Option<String>,

    /// The mobile network operator's reference.
    pub mno_reference: Option<String>,

    /// Amount echoed by the provider, verbatim decimal text.
    pub amount: Option<Decimal>,

    /// ISO currency code.
    pub currency: Option<String>,

    /// Account balance entries, when the response carries them. The wire
    /// form repeats a `Currency` element which may appear once or many
    /// times; it is always a list here.
    pub balances: Vec<BalanceEntry>,
}

/// One currency's balance inside a response balance block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceEntry {
    /// ISO currency code.
    pub code: String,

    /// Balance amount in that currency.
    pub amount: Option<Decimal>,
}

/// Build an AutoCreate request body.
///
/// `params` preserves caller order; entries whose value is `None` or
/// empty are omitted. Values are XML-escaped.
pub fn build_request(
    api_username: &str,
    api_password: &str,
    method: &str,
    params: &[(&str, Option<String>)],
) -> String {
    let mut body = String::with_capacity(256);
    body.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    body.push_str("<AutoCreate><Request>");
    push_element(&mut body, "APIUsername", api_username);
    push_element(&mut body, "APIPassword", api_password);
    push_element(&mut body, "Method", method);
    for (name, value) in params {
        match value {
            Some(v) if !v.is_empty() => push_element(&mut body, name, v),
            _ => {}
        }
    }
    body.push_str("</Request></AutoCreate>");
    body
}

fn push_element(body: &mut String, name: &str, value: &str) {
    body.push('<');
    body.push_str(name);
    body.push('>');
    body.push_str(&escape(value));
    body.push_str("</");
    body.push_str(name);
    body.push('>');
}

/// Parse an AutoCreate response body into its typed view.
///
/// Fails when the body is not well-formed XML or lacks the nested
/// `Response` element.
pub fn parse_response(xml: &str) -> Result<YoResponse, EnvelopeError> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut response = YoResponse::default();
    let mut saw_response = false;
    let mut pending_balance: Option<BalanceEntry> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if name == "Currency" && in_balance_block(&path) {
                    pending_balance = Some(BalanceEntry::default());
                }
                path.push(name);
                text.clear();
            }
            Ok(Event::Text(t)) => {
                let fragment = t
                    .unescape()
                    .map_err(|e| EnvelopeError(format!("bad text content: {e}")))?;
                text.push_str(&fragment);
            }
            Ok(Event::End(_)) => {
                let element = match path.pop() {
                    Some(element) => element,
                    None => return Err(EnvelopeError("unbalanced element nesting".into())),
                };
                let value = text.trim().to_string();
                text.clear();

                if element == "Response" && path == ["AutoCreate"] {
                    saw_response = true;
                }

                if element == "Currency" && in_balance_block(&path) {
                    if let Some(entry) = pending_balance.take() {
                        response.balances.push(entry);
                    }
                    continue;
                }

                if value.is_empty() {
                    continue;
                }

                match (in_response(&path), element.as_str()) {
                    (true, "Status") => response.status = Some(value),
                    (true, "StatusCode") => {
                        let code = value.parse::<i64>().map_err(|_| {
                            EnvelopeError(format!("non-numeric StatusCode: {value}"))
                        })?;
                        response.status_code = Some(code);
                    }
                    (true, "StatusMessage") => response.status_message = Some(value),
                    (true, "TransactionStatus") => response.transaction_status = Some(value),
                    (true, "TransactionReference") => {
                        response.transaction_reference = Some(value)
                    }
                    (true, "MNOTransactionReferenceId") => response.mno_reference = Some(value),
                    (true, "Amount") if !in_balance_entry(&path) => {
                        response.amount = value.parse().ok()
                    }
                    (true, "CurrencyCode") => response.currency = Some(value),
                    (true, "Code") if in_balance_entry(&path) => {
                        if let Some(entry) = pending_balance.as_mut() {
                            entry.code = value;
                        }
                    }
                    (true, "Balance") if in_balance_entry(&path) => {
                        if let Some(entry) = pending_balance.as_mut() {
                            entry.amount = value.parse().ok();
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(EnvelopeError(format!("malformed XML: {e}"))),
        }
    }

    if !saw_response {
        return Err(EnvelopeError("missing AutoCreate/Response element".into()));
    }
    Ok(response)
}

fn in_response(path: &[String]) -> bool {
    path.len() >= 2 && path[0] == "AutoCreate" && path[1] == "Response"
}

fn in_balance_block(path: &[String]) -> bool {
    in_response(path) && path.last().map(String::as_str) == Some("Balance")
}

fn in_balance_entry(path: &[String]) -> bool {
    in_response(path) && path.last().map(String::as_str) == Some("Currency")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_request_with_credentials_and_method() {
        let body = build_request(
            "100200",
            "pass",
            "acdepositfunds",
            &[
                ("NonBlocking", Some("TRUE".to_string())),
                ("Amount", Some("50000".to_string())),
                ("Account", Some("0770000000".to_string())),
            ],
        );

        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(body.contains("<AutoCreate><Request>"));
        assert!(body.contains("<APIUsername>100200</APIUsername>"));
        assert!(body.contains("<APIPassword>pass</APIPassword>"));
        assert!(body.contains("<Method>acdepositfunds</Method>"));
        assert!(body.contains("<Amount>50000</Amount>"));
        assert!(body.ends_with("</Request></AutoCreate>"));
    }

    #[test]
    fn omits_empty_and_absent_parameters() {
        let body = build_request(
            "u",
            "p",
            "acdepositfunds",
            &[
                ("Narrative", Some("Rent".to_string())),
                ("InstantNotificationUrl", None),
                ("FailureNotificationUrl", Some(String::new())),
            ],
        );

        assert!(body.contains("<Narrative>Rent</Narrative>"));
        assert!(!body.contains("InstantNotificationUrl"));
        assert!(!body.contains("FailureNotificationUrl"));
    }

    #[test]
    fn escapes_parameter_values() {
        let body = build_request(
            "u",
            "p&q",
            "acdepositfunds",
            &[("Narrative", Some("Rent <May> & dues".to_string()))],
        );

        assert!(body.contains("<APIPassword>p&amp;q</APIPassword>"));
        assert!(body.contains("<Narrative>Rent &lt;May&gt; &amp; dues</Narrative>"));
    }

    #[test]
    fn parses_full_response() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <AutoCreate>
              <Response>
                <Status>OK</Status>
                <StatusCode>0</StatusCode>
                <StatusMessage>Transaction successful</StatusMessage>
                <TransactionStatus>SUCCEEDED</TransactionStatus>
                <TransactionReference>12345678</TransactionReference>
                <MNOTransactionReferenceId>MTN-99</MNOTransactionReferenceId>
                <Amount>50000</Amount>
                <CurrencyCode>UGX</CurrencyCode>
              </Response>
            </AutoCreate>"#;

        let response = parse_response(xml).unwrap();
        assert_eq!(response.status.as_deref(), Some("OK"));
        assert_eq!(response.status_code, Some(0));
        assert_eq!(
            response.status_message.as_deref(),
            Some("Transaction successful")
        );
        assert_eq!(response.transaction_status.as_deref(), Some("SUCCEEDED"));
        assert_eq!(response.transaction_reference.as_deref(), Some("12345678"));
        assert_eq!(response.mno_reference.as_deref(), Some("MTN-99"));
        assert_eq!(response.amount, Some(Decimal::from(50_000)));
        assert_eq!(response.currency.as_deref(), Some("UGX"));
        assert!(response.balances.is_empty());
    }

    #[test]
    fn normalizes_single_balance_entry_to_list() {
        let xml = r#"<AutoCreate><Response>
            <Status>OK</Status>
            <StatusCode>0</StatusCode>
            <Balance>
              <Currency><Code>UGX</Code><Balance>150000</Balance></Currency>
            </Balance>
          </Response></AutoCreate>"#;

        let response = parse_response(xml).unwrap();
        assert_eq!(response.balances.len(), 1);
        assert_eq!(response.balances[0].code, "UGX");
        assert_eq!(response.balances[0].amount, Some(Decimal::from(150_000)));
    }

    #[test]
    fn normalizes_repeated_balance_entries_to_list() {
        let xml = r#"<AutoCreate><Response>
            <Status>OK</Status>
            <StatusCode>0</StatusCode>
            <Balance>
              <Currency><Code>UGX</Code><Balance>150000</Balance></Currency>
              <Currency><Code>USD</Code><Balance>25.50</Balance></Currency>
            </Balance>
          </Response></AutoCreate>"#;

        let response = parse_response(xml).unwrap();
        assert_eq!(response.balances.len(), 2);
        assert_eq!(response.balances[0].code, "UGX");
        assert_eq!(response.balances[1].code, "USD");
        assert_eq!(
            response.balances[1].amount,
            Some("25.50".parse::<Decimal>().unwrap())
        );
    }

    #[test]
    fn missing_response_element_is_a_hard_failure() {
        let xml = "<AutoCreate><SomethingElse/></AutoCreate>";
        assert!(parse_response(xml).is_err());

        let xml = "<html><body>gateway timeout</body></html>";
        assert!(parse_response(xml).is_err());
    }

    #[test]
    fn malformed_xml_is_a_hard_failure() {
        assert!(parse_response("<AutoCreate><Response>").is_err());
        assert!(parse_response("not xml at all").is_err());
    }

    #[test]
    fn round_trips_built_request_fields_through_parser_shapes() {
        // A synthetic response mirroring a built request's fields decodes
        // into every typed field the codec exposes.
        let body = build_request(
            "u",
            "p",
            "acdepositfunds",
            &[
                ("Amount", Some("1500".to_string())),
                ("Account", Some("0772123456".to_string())),
                ("ExternalReference", Some("PAY-1".to_string())),
            ],
        );
        assert!(body.contains("<ExternalReference>PAY-1</ExternalReference>"));

        let xml = r#"<AutoCreate><Response>
            <Status>OK</Status><StatusCode>1</StatusCode>
            <TransactionReference>yo-1</TransactionReference>
            <Amount>1500</Amount><CurrencyCode>UGX</CurrencyCode>
          </Response></AutoCreate>"#;
        let response = parse_response(xml).unwrap();
        assert_eq!(response.status_code, Some(1));
        assert_eq!(response.amount, Some(Decimal::from(1500)));
        assert_eq!(response.transaction_reference.as_deref(), Some("yo-1"));
    }
}
