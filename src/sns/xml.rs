//! Namespace-aware parsing of the ConfirmSubscription response.
//!
//! # Responsibilities
//! - Build a small element tree from the response body (quick-xml `NsReader`)
//! - Reject anything that is not a single well-formed document
//! - Locate `ConfirmSubscriptionResult/SubscriptionArn` in the SNS namespace
//!
//! # Design Decisions
//! - Elements are matched by (namespace URI, local name), never by prefix
//! - A missing node and an empty node are the same outcome: `None`
//! - Parsing runs on the blocking pool so the request task only awaits it

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use thiserror::Error;

use crate::sns::SNS_NAMESPACE;

/// Reasons a response body is not a usable XML document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Extra content at the end of the document")]
    MultipleRoots,

    #[error("Premature end of data in tag {0}")]
    Unclosed(String),

    #[error("Text content outside the root element")]
    TextOutsideRoot,

    #[error("Namespace prefix {0} is not defined")]
    UnboundPrefix(String),

    #[error("XML parser task failed: {0}")]
    Task(String),
}

/// An element with its resolved namespace, text and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn new(namespace: Option<String>, start: &BytesStart<'_>) -> Self {
        Self {
            namespace,
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// True when the element has this namespace URI and local name.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// First direct child matching namespace and local name.
    pub fn child(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(namespace, name))
    }

    /// This element and everything below it, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Pre-order walk over an element subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// A parsed document with exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let mut reader = NsReader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut open: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let namespace = owned_namespace(resolved)?;

            match event {
                Event::Start(start) => open.push(XmlElement::new(namespace, &start)),
                Event::Empty(start) => {
                    close_element(&mut open, &mut root, XmlElement::new(namespace, &start))?
                }
                Event::End(_) => {
                    // The reader already rejects unmatched end tags.
                    if let Some(element) = open.pop() {
                        close_element(&mut open, &mut root, element)?;
                    }
                }
                Event::Text(text) => push_text(&mut open, text.unescape()?)?,
                Event::CData(data) => {
                    let data = data.into_inner();
                    push_text(&mut open, String::from_utf8_lossy(&data))?
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.pop() {
            return Err(XmlError::Unclosed(unclosed.name));
        }

        root.map(|root| Self { root }).ok_or(XmlError::NoRootElement)
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

fn owned_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>, XmlError> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(XmlError::UnboundPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

fn close_element(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::MultipleRoots);
    }
    *root = Some(element);
    Ok(())
}

fn push_text(open: &mut [XmlElement], text: Cow<'_, str>) -> Result<(), XmlError> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(&text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::TextOutsideRoot),
    }
}

/// Parse on tokio's blocking pool.
pub async fn parse_document(body: String) -> Result<XmlDocument, XmlError> {
    tokio::task::spawn_blocking(move || XmlDocument::parse(&body))
        .await
        .map_err(|e| XmlError::Task(e.to_string()))?
}

/// Find `//sns:ConfirmSubscriptionResult/sns:SubscriptionArn` and return its text.
///
/// Empty or whitespace-only values count as absent.
pub fn subscription_arn(document: &XmlDocument) -> Option<String> {
    document
        .root()
        .descendants()
        .filter(|e| e.is(SNS_NAMESPACE, "ConfirmSubscriptionResult"))
        .find_map(|result| result.child(SNS_NAMESPACE, "SubscriptionArn"))
        .map(|arn| arn.text.trim())
        .filter(|arn| !arn.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str =
        "arn:aws:sns:us-west-2:123456789012:MyTopic:2bcfbf39-05c3-41de-beaa-fcfcc21c8f55";

    fn response_with(result: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ConfirmSubscriptionResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/">
  {result}
  <ResponseMetadata>
    <RequestId>075ecce8-8dac-11e1-bf80-f781d96e9307</RequestId>
  </ResponseMetadata>
</ConfirmSubscriptionResponse>"#
        )
    }

    #[test]
    fn test_extracts_subscription_arn() {
        let xml = response_with(&format!(
            "<ConfirmSubscriptionResult><SubscriptionArn>{ARN}</SubscriptionArn></ConfirmSubscriptionResult>"
        ));
        let doc = XmlDocument::parse(&xml).unwrap();
        assert_eq!(doc.root().name, "ConfirmSubscriptionResponse");
        assert_eq!(doc.root().namespace.as_deref(), Some(SNS_NAMESPACE));
        assert_eq!(subscription_arn(&doc).as_deref(), Some(ARN));
    }

    #[test]
    fn test_prefixed_namespace_matches() {
        let xml = format!(
            r#"<sns:ConfirmSubscriptionResponse xmlns:sns="{SNS_NAMESPACE}"><sns:ConfirmSubscriptionResult><sns:SubscriptionArn>{ARN}</sns:SubscriptionArn></sns:ConfirmSubscriptionResult></sns:ConfirmSubscriptionResponse>"#
        );
        let doc = XmlDocument::parse(&xml).unwrap();
        assert_eq!(subscription_arn(&doc).as_deref(), Some(ARN));
    }

    #[test]
    fn test_wrong_namespace_is_not_found() {
        let xml = format!(
            "<ConfirmSubscriptionResponse><ConfirmSubscriptionResult><SubscriptionArn>{ARN}</SubscriptionArn></ConfirmSubscriptionResult></ConfirmSubscriptionResponse>"
        );
        let doc = XmlDocument::parse(&xml).unwrap();
        assert_eq!(subscription_arn(&doc), None);
    }

    #[test]
    fn test_missing_node_is_not_found() {
        let doc = XmlDocument::parse(&response_with("<ConfirmSubscriptionResult/>")).unwrap();
        assert_eq!(subscription_arn(&doc), None);
    }

    #[test]
    fn test_empty_arn_is_not_found() {
        let doc = XmlDocument::parse(&response_with(
            "<ConfirmSubscriptionResult><SubscriptionArn>  </SubscriptionArn></ConfirmSubscriptionResult>",
        ))
        .unwrap();
        assert_eq!(subscription_arn(&doc), None);

        let doc = XmlDocument::parse(&response_with(
            "<ConfirmSubscriptionResult><SubscriptionArn/></ConfirmSubscriptionResult>",
        ))
        .unwrap();
        assert_eq!(subscription_arn(&doc), None);
    }

    #[test]
    fn test_arn_must_be_direct_child_of_result() {
        let doc = XmlDocument::parse(&response_with(&format!(
            "<ConfirmSubscriptionResult><Wrapper><SubscriptionArn>{ARN}</SubscriptionArn></Wrapper></ConfirmSubscriptionResult>"
        )))
        .unwrap();
        assert_eq!(subscription_arn(&doc), None);
    }

    #[test]
    fn test_aws_error_document_is_not_found() {
        let xml = r#"<ErrorResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/"><Error><Type>Sender</Type><Code>InvalidParameter</Code><Message>Invalid token</Message></Error></ErrorResponse>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(subscription_arn(&doc), None);
    }

    #[test]
    fn test_cdata_and_entities_are_text() {
        let doc = XmlDocument::parse("<a><b>x &amp; y</b><c><![CDATA[<raw>]]></c></a>").unwrap();
        let root = doc.root();
        assert_eq!(root.children[0].text, "x & y");
        assert_eq!(root.children[1].text, "<raw>");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = XmlDocument::parse("<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<_> = doc.root().descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(XmlDocument::parse(""), Err(XmlError::NoRootElement)));
        assert!(matches!(XmlDocument::parse("   \n"), Err(XmlError::NoRootElement)));
    }

    #[test]
    fn test_plain_text_fails() {
        assert!(matches!(
            XmlDocument::parse("Service Unavailable"),
            Err(XmlError::TextOutsideRoot)
        ));
    }

    #[test]
    fn test_mismatched_tags_fail() {
        assert!(matches!(
            XmlDocument::parse("<a><b></a></b>"),
            Err(XmlError::Syntax(_))
        ));
    }

    #[test]
    fn test_unclosed_element_fails() {
        let err = XmlDocument::parse("<a><b>text</b>").unwrap_err();
        assert!(matches!(err, XmlError::Unclosed(ref name) if name == "a"));
    }

    #[test]
    fn test_multiple_roots_fail() {
        assert!(matches!(
            XmlDocument::parse("<a/><b/>"),
            Err(XmlError::MultipleRoots)
        ));
    }

    #[test]
    fn test_unbound_prefix_fails() {
        assert!(matches!(
            XmlDocument::parse("<x:a/>"),
            Err(XmlError::UnboundPrefix(prefix)) if prefix == "x"
        ));
    }

    #[tokio::test]
    async fn test_parse_document_on_blocking_pool() {
        let xml = response_with(&format!(
            "<ConfirmSubscriptionResult><SubscriptionArn>{ARN}</SubscriptionArn></ConfirmSubscriptionResult>"
        ));
        let doc = parse_document(xml).await.unwrap();
        assert_eq!(subscription_arn(&doc).as_deref(), Some(ARN));

        assert!(parse_document(String::new()).await.is_err());
    }
}
