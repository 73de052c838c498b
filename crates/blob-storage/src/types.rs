//! Blob service data types.

use serde::{Deserialize, Serialize};

/// An object stored in the container, as shown in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobItem {
    pub name: String,
    /// Readable URL (without the SAS token).
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// `List Blobs` response body (`EnumerationResults`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct EnumerationResults {
    #[serde(default)]
    pub blobs: BlobList,
    #[serde(default)]
    pub next_marker: Option<String>,
}

impl EnumerationResults {
    /// Continuation marker, if another page follows.
    pub fn continuation(&self) -> Option<&str> {
        self.next_marker
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BlobList {
    #[serde(rename = "Blob", default)]
    pub blob: Vec<BlobEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct BlobEntry {
    pub name: String,
    #[serde(default)]
    pub properties: BlobProperties,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BlobProperties {
    #[serde(rename = "Content-Length", default)]
    pub content_length: Option<u64>,
    #[serde(rename = "Content-Type", default)]
    pub content_type: Option<String>,
}

/// Parses a `List Blobs` XML page.
pub(crate) fn parse_listing(xml: &str) -> Result<EnumerationResults, quick_xml::DeError> {
    // The service prefixes its XML with a UTF-8 BOM.
    quick_xml::de::from_str(xml.trim_start_matches('\u{feff}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>\
<EnumerationResults ServiceEndpoint=\"https://acct.blob.core.windows.net/\" ContainerName=\"photos\">\
<Blobs>\
<Blob><Name>cat.png</Name><Properties><Content-Length>1024</Content-Length><Content-Type>image/png</Content-Type><BlobType>BlockBlob</BlobType></Properties><OrMetadata /></Blob>\
<Blob><Name>dog.jpg</Name><Properties><Content-Length>2048</Content-Length><Content-Type>image/jpeg</Content-Type></Properties></Blob>\
</Blobs>\
<NextMarker>2!72!MDAwMDEx</NextMarker>\
</EnumerationResults>";

    #[test]
    fn parses_blobs_and_marker() {
        let page = parse_listing(PAGE).unwrap();
        assert_eq!(page.blobs.blob.len(), 2);
        assert_eq!(page.blobs.blob[0].name, "cat.png");
        assert_eq!(page.blobs.blob[0].properties.content_length, Some(1024));
        assert_eq!(
            page.blobs.blob[1].properties.content_type.as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(page.continuation(), Some("2!72!MDAwMDEx"));
    }

    #[test]
    fn last_page_has_no_continuation() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
<EnumerationResults ContainerName=\"photos\"><Blobs><Blob><Name>a.txt</Name></Blob></Blobs><NextMarker /></EnumerationResults>";
        let page = parse_listing(xml).unwrap();
        assert_eq!(page.blobs.blob.len(), 1);
        assert_eq!(page.continuation(), None);
    }

    #[test]
    fn empty_container() {
        let xml = "<EnumerationResults ContainerName=\"photos\"><Blobs /><NextMarker /></EnumerationResults>";
        let page = parse_listing(xml).unwrap();
        assert!(page.blobs.blob.is_empty());
        assert_eq!(page.continuation(), None);
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(parse_listing("<EnumerationResults><Blobs><Blob>").is_err());
    }
}
