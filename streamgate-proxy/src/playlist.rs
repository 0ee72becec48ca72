//! HLS playlist detection and rewriting

use streamgate_core::ProxyUrlBuilder;
use url::Url;

/// Content type sent with every rewritten playlist
pub const HLS_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// A response is a playlist when its path ends in `.m3u8` or its content type
/// mentions `mpegurl` (`application/vnd.apple.mpegurl`, `audio/x-mpegurl`, ...).
#[must_use]
pub fn is_playlist(target: &Url, content_type: Option<&str>) -> bool {
    target.path().to_ascii_lowercase().ends_with(".m3u8")
        || content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("mpegurl"))
}

/// Route every URI line of a playlist back through the manifest proxy.
///
/// Tag and comment lines (`#...`) and blank lines are kept byte-for-byte,
/// so the output always has exactly as many lines as the input. Relative
/// URIs resolve against `target` before wrapping; absolute ones are wrapped
/// as written.
#[must_use]
pub fn rewrite_playlist(body: &str, target: &Url, urls: &ProxyUrlBuilder) -> String {
    let mut output = String::with_capacity(body.len() * 2);

    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            output.push('\n');
        }

        let (content, carriage_return) = match line.strip_suffix('\r') {
            Some(content) => (content, "\r"),
            None => (line, ""),
        };
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            output.push_str(line);
            continue;
        }

        output.push_str(&urls.manifest(&make_absolute(trimmed, target)));
        output.push_str(carriage_return);
    }

    output
}

fn make_absolute(raw: &str, base: &Url) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }
    base.join(raw).map_or_else(|_| raw.to_string(), |joined| joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MASTER: &str = "#EXTM3U\n\
        #EXT-X-STREAM-INF:BANDWIDTH=2000000,RESOLUTION=1280x720\n\
        720/index.m3u8\n\
        #EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=854x480\n\
        /abs/480/index.m3u8\n\
        https://other-cdn.example/360/index.m3u8?token=a b\n";

    fn target() -> Url {
        Url::parse("https://cdn.example/hls/603/master.m3u8").unwrap()
    }

    fn decoded_target(line: &str) -> String {
        let parsed = Url::parse(&format!("http://gateway.example{line}")).unwrap();
        let params: HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        params["url"].clone()
    }

    #[test]
    fn test_detects_playlists() {
        assert!(is_playlist(&target(), None));
        assert!(is_playlist(&Url::parse("https://c/INDEX.M3U8").unwrap(), None));
        assert!(is_playlist(
            &Url::parse("https://c/playlist").unwrap(),
            Some("application/vnd.apple.mpegURL")
        ));
        assert!(is_playlist(&Url::parse("https://c/p").unwrap(), Some("audio/x-mpegurl")));
        assert!(!is_playlist(&Url::parse("https://c/seg1.ts").unwrap(), Some("video/mp2t")));
        assert!(!is_playlist(&Url::parse("https://c/seg1.ts?x=.m3u8").unwrap(), None));
    }

    #[test]
    fn test_rewrite_keeps_line_count_and_tags() {
        let urls = ProxyUrlBuilder::default();
        let rewritten = rewrite_playlist(MASTER, &target(), &urls);

        let before: Vec<_> = MASTER.split('\n').collect();
        let after: Vec<_> = rewritten.split('\n').collect();
        assert_eq!(before.len(), after.len());

        for (original, line) in before.iter().zip(&after) {
            if original.is_empty() || original.starts_with('#') {
                assert_eq!(original, line);
            } else {
                assert!(line.starts_with("/proxy/manifest?url="), "{line}");
            }
        }
    }

    #[test]
    fn test_rewritten_uris_round_trip() {
        let urls = ProxyUrlBuilder::default();
        let rewritten = rewrite_playlist(MASTER, &target(), &urls);
        let lines: Vec<_> = rewritten.lines().collect();

        assert_eq!(decoded_target(lines[2]), "https://cdn.example/hls/603/720/index.m3u8");
        assert_eq!(decoded_target(lines[4]), "https://cdn.example/abs/480/index.m3u8");
        // Absolute URIs are carried verbatim, unnormalized
        assert_eq!(
            decoded_target(lines[5]),
            "https://other-cdn.example/360/index.m3u8?token=a b"
        );
    }

    #[test]
    fn test_relative_segment_joins_target_directory() {
        let target = Url::parse("https://cdn.example/a/b/index.m3u8").unwrap();
        let urls = ProxyUrlBuilder::default();
        let rewritten = rewrite_playlist(
            "#EXTM3U\n#EXTINF:4.0,\nseg1.ts\n#EXTINF:4.0,\nhttps://cdn.example/a/b/seg2.ts",
            &target,
            &urls,
        );
        let lines: Vec<_> = rewritten.split('\n').collect();
        assert_eq!(decoded_target(lines[2]), "https://cdn.example/a/b/seg1.ts");
        assert_eq!(decoded_target(lines[4]), "https://cdn.example/a/b/seg2.ts");
        assert!(!lines[4].contains("/proxy/manifest?url=%2Fproxy"));
    }

    #[test]
    fn test_media_playlist_segments_and_crlf() {
        let urls = ProxyUrlBuilder::new("http://127.0.0.1:8080/");
        let media = "#EXTM3U\r\n#EXT-X-KEY:METHOD=AES-128,URI=\"key.bin\"\r\n#EXTINF:6.0,\r\nseg-1.ts\r\n\r\n#EXT-X-ENDLIST";
        let rewritten = rewrite_playlist(media, &target(), &urls);
        let lines: Vec<_> = rewritten.split('\n').collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "#EXT-X-KEY:METHOD=AES-128,URI=\"key.bin\"\r");
        assert!(lines[3].starts_with("http://127.0.0.1:8080/proxy/manifest?url="));
        assert!(lines[3].ends_with('\r'));
        assert_eq!(
            decoded_target(lines[3].trim_start_matches("http://127.0.0.1:8080").trim_end()),
            "https://cdn.example/hls/603/seg-1.ts"
        );
        assert_eq!(lines[4], "\r");
        assert_eq!(lines[5], "#EXT-X-ENDLIST");
    }

    #[test]
    fn test_empty_and_whitespace_lines() {
        let urls = ProxyUrlBuilder::default();
        assert_eq!(rewrite_playlist("", &target(), &urls), "");
        assert_eq!(rewrite_playlist("  \n\t", &target(), &urls), "  \n\t");
    }
}
