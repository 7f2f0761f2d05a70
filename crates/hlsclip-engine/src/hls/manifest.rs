// Line-oriented media playlist parser. Only `#EXTINF` durations and the URI lines
// following them are recognised; every other line is ignored.

use tracing::{debug, trace};

const EXTINF_TAG: &str = "#EXTINF:";

/// One media segment as listed in the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDescriptor {
    /// Zero-based position in playback order
    pub sequence_index: usize,
    /// URI exactly as written in the manifest (may be relative)
    pub url: String,
    /// Duration in seconds
    pub duration: f64,
}

/// Parsed manifest: descriptors in playback order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestDocument {
    segments: Vec<SegmentDescriptor>,
}

impl ManifestDocument {
    pub fn new(segments: Vec<SegmentDescriptor>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[SegmentDescriptor] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of all segment durations, in seconds
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

/// Parse manifest text into a [`ManifestDocument`].
///
/// Never fails. Malformed `#EXTINF` values are skipped, a trailing `#EXTINF`
/// without a URI line is dropped, and a URI with no preceding duration gets a
/// duration of zero.
pub fn parse_manifest(text: &str) -> ManifestDocument {
    let mut segments = Vec::new();
    let mut pending_duration: Option<f64> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(EXTINF_TAG) {
            match parse_extinf_duration(rest) {
                Some(duration) => pending_duration = Some(duration),
                None => debug!(line, "Skipping malformed EXTINF line"),
            }
            continue;
        }

        if line.starts_with('#') {
            trace!(line, "Ignoring manifest directive");
            continue;
        }

        let duration = pending_duration.take().unwrap_or_else(|| {
            debug!(uri = line, "Segment URI without EXTINF, assuming zero duration");
            0.0
        });
        segments.push(SegmentDescriptor {
            sequence_index: segments.len(),
            url: line.to_string(),
            duration,
        });
    }

    if pending_duration.is_some() {
        debug!("Dropping trailing EXTINF without a segment URI");
    }

    ManifestDocument::new(segments)
}

/// First comma-delimited field after the tag's colon, e.g. `10.0` in `#EXTINF:10.0,title`.
fn parse_extinf_duration(rest: &str) -> Option<f64> {
    let field = rest.split([',', ':']).next()?.trim();
    let duration = field.parse::<f64>().ok()?;
    (duration.is_finite() && duration >= 0.0).then_some(duration)
}

/// Whether the URL path looks like an HLS playlist. Advisory only.
pub fn check_manifest_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".m3u8")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOD_PLAYLIST: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:0
#EXTINF:9.009,
segment0.ts
#EXTINF:9.009,
https://cdn.example.com/video/segment1.ts?token=abc
#EXTINF:3.003,
segment2.ts
#EXT-X-ENDLIST
";

    #[test]
    fn test_parse_vod_playlist() {
        let doc = parse_manifest(VOD_PLAYLIST);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.segments()[0].url, "segment0.ts");
        assert_eq!(
            doc.segments()[1].url,
            "https://cdn.example.com/video/segment1.ts?token=abc"
        );
        assert_eq!(doc.segments()[2].duration, 3.003);

        let indices: Vec<_> = doc.segments().iter().map(|s| s.sequence_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_total_duration_matches_declared() {
        let doc = parse_manifest(VOD_PLAYLIST);
        assert!((doc.total_duration() - 21.021).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_extinf_is_dropped() {
        let text = "#EXTM3U\n#EXTINF:4.0,\na.ts\n#EXTINF:4.0,\n";
        let doc = parse_manifest(text);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.segments()[0].url, "a.ts");
        assert_eq!(doc.total_duration(), 4.0);
    }

    #[test]
    fn test_uri_without_extinf_has_zero_duration() {
        let doc = parse_manifest("#EXTM3U\nlonely.ts\n#EXTINF:2.5,\nnext.ts\n");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.segments()[0].duration, 0.0);
        assert_eq!(doc.segments()[1].duration, 2.5);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "#EXTINF:abc,\nfirst.ts\n\n   \n#EXTINF:6,title: with colon\nsecond.ts\n";
        let doc = parse_manifest(text);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.segments()[0].duration, 0.0);
        assert_eq!(doc.segments()[1].duration, 6.0);
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = parse_manifest("#EXTM3U\r\n#EXTINF:1.5,\r\nseg.ts\r\n");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.segments()[0].url, "seg.ts");
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_manifest("");
        assert!(doc.is_empty());
        assert_eq!(doc.total_duration(), 0.0);
    }

    #[test]
    fn test_check_manifest_url() {
        assert!(check_manifest_url("https://example.com/vod/index.m3u8"));
        assert!(check_manifest_url("https://example.com/vod/index.M3U8?sig=1"));
        assert!(!check_manifest_url("https://example.com/playlist?id=42"));
    }
}
