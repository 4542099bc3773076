use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Title and year recovered from a release-group filename.
///
/// `title` is lowercase and single-spaced; `year`, when present, is a four
/// digit string starting with `19` or `20`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFilename {
    pub title: Option<String>,
    pub year: Option<String>,
}

static RE_BRACKETS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\[\]\(\)\{\}]").unwrap());

// 720p, 1080p, 2160p ...
static RE_RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[0-9]{3,4}p\b").unwrap());

static RE_RELEASE_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(web-?dl|b[rd]-?rip|blu-?ray|[hx]\.?26[45]|hevc|avc|aac|dolby|atmos|dts)\b",
    )
    .unwrap()
});

static RE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.?\b(mkv|mp4|m4v|avi)$").unwrap());

// Tracker sites: "site.org", "rarbg-mirror.live" ...
static RE_SITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^| )((www)?[a-z0-9\-]+?\.(org|net|live))\b").unwrap()
});

static RE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\.\-:\(\)]").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// Only years starting with 19 or 20, so stray bitrates and resolutions are not mistaken for one.
static RE_TITLE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.+?)\s+(?P<year>(?:19|20)[0-9]{2})").unwrap()
});

/// Strip brackets, release tags, extensions and tracker sites from a filename,
/// leaving lowercase words separated by single spaces.
///
/// One ordered pass. Cleaning the output again changes nothing unless it still
/// ends in an extension-like word: `"Movie With Avi.mkv"` cleans to
/// `"movie with avi"`, and only a second pass would drop `avi`.
pub fn clean(raw: &str) -> String {
    let s = RE_BRACKETS.replace_all(raw, " ");
    let s = RE_RESOLUTION.replace_all(&s, "");
    let s = RE_RELEASE_TAGS.replace_all(&s, "");
    let s = RE_EXTENSION.replace_all(&s, "");
    let s = RE_SITE.replace_all(&s, "");
    let s = RE_PUNCTUATION.replace_all(&s, " ");
    let s = RE_WHITESPACE.replace_all(&s, " ");
    s.trim().to_lowercase()
}

/// Parse a release-group filename into a title and an optional year.
///
/// A cleaned string without any letter or digit yields neither field.
pub fn parse(raw: &str) -> ParsedFilename {
    let cleaned = clean(raw);

    if let Some(caps) = RE_TITLE_YEAR.captures(&cleaned) {
        return ParsedFilename {
            title: Some(caps["title"].trim().to_string()),
            year: Some(caps["year"].to_string()),
        };
    }

    if cleaned.chars().any(char::is_alphanumeric) {
        return ParsedFilename {
            title: Some(cleaned),
            year: None,
        };
    }

    ParsedFilename::default()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parsed(title: &str, year: Option<&str>) -> ParsedFilename {
        ParsedFilename {
            title: Some(title.into()),
            year: year.map(Into::into),
        }
    }

    #[test]
    fn parse_dotted_release() {
        assert_eq!(
            parse("The.Matrix.1999.1080p.BluRay.x264-GROUP"),
            parsed("the matrix", Some("1999"))
        );
    }

    #[test]
    fn parse_without_year() {
        assert_eq!(
            parse("Some Movie WEB-DL AAC.mkv"),
            parsed("some movie", None)
        );
    }

    #[test]
    fn parse_bracketed_year() {
        assert_eq!(
            parse("Alien (1979) [1080p]"),
            parsed("alien", Some("1979"))
        );
        assert_eq!(
            parse("[Group] Title: Subtitle (2001) {x265}"),
            parsed("group title subtitle", Some("2001"))
        );
    }

    #[test]
    fn first_year_like_word_wins() {
        assert_eq!(
            parse("Blade Runner 2049 (2017) [2160p] {HEVC} DTS.mkv"),
            parsed("blade runner", Some("2049"))
        );
    }

    #[test]
    fn year_must_follow_whitespace() {
        // A year glued to the start of the string is the title itself.
        assert_eq!(parse("1917.mkv"), parsed("1917", None));
        assert_eq!(parse("1917 2019 720p"), parsed("1917", Some("2019")));
    }

    #[test]
    fn ignores_years_outside_19xx_20xx() {
        assert_eq!(parse("Movie 1850 Remastered"), parsed("movie 1850 remastered", None));
        assert_eq!(parse("Far Future 2099"), parsed("far future", Some("2099")));
    }

    #[test]
    fn codec_tokens_with_dots() {
        assert_eq!(
            parse("Heat.1995.H.264.DD5.1"),
            parsed("heat", Some("1995"))
        );
        assert_eq!(
            parse("Heat 1995 BDRip Dolby Atmos x.265.mp4"),
            parsed("heat", Some("1995"))
        );
    }

    #[test]
    fn removes_tracker_sites() {
        assert_eq!(
            parse("TorrentSite.org - Arrival 2016 BRRip.avi"),
            parsed("arrival", Some("2016"))
        );
        assert_eq!(
            parse("Arrival 2016 some-tracker.live"),
            parsed("arrival", Some("2016"))
        );
    }

    #[test]
    fn trailing_content_after_year_is_discarded() {
        assert_eq!(
            parse("Dune Part Two 2024 IMAX 2160p WEB-DL DDP5 1 Atmos"),
            parsed("dune part two", Some("2024"))
        );
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert_eq!(parse(""), ParsedFilename::default());
        assert_eq!(parse("   "), ParsedFilename::default());
        assert_eq!(parse("###"), ParsedFilename::default());
        assert_eq!(parse("[](){}"), ParsedFilename::default());
        assert_eq!(parse("1080p.mkv"), ParsedFilename::default());
    }

    #[test]
    fn only_the_last_extension_is_stripped() {
        assert_eq!(parse("Movie.mkv.mkv"), parsed("movie mkv", None));
        assert_eq!(parse("Movie With Avi.mkv"), parsed("movie with avi", None));
        assert_eq!(clean("Movie With Avi"), "movie with");
    }

    #[test]
    fn clean_is_stable_on_its_output() {
        for raw in [
            "The.Matrix.1999.1080p.BluRay.x264-GROUP",
            "Some Movie WEB-DL AAC.mkv",
            "[Group] Title: Subtitle (2001) {x265}",
            "www.example.net Title",
        ] {
            let once = clean(raw);
            assert_eq!(clean(&once), once, "cleaning {raw:?} twice changed it");
        }
    }

    #[test]
    fn clean_normalises_whitespace_and_case() {
        assert_eq!(clean("  Mad   Max:\tFury  Road  "), "mad max fury road");
    }

    // Title words that survive cleaning untouched: no release tags, extensions
    // or site suffixes.
    fn plain_word() -> impl Strategy<Value = String> {
        "[A-Za-z]{1,8}".prop_filter("release-tag word", |w| {
            !matches!(
                w.to_lowercase().as_str(),
                "avc" | "aac" | "dts" | "hevc" | "atmos" | "dolby" | "bdrip" | "brrip"
                    | "bluray" | "webdl" | "mkv" | "mp4" | "m4v" | "avi" | "org" | "net"
                    | "live"
            )
        })
    }

    proptest! {
        #[test]
        fn clean_twice_is_clean_once(raw in "[ -~\t]{0,40}") {
            let once = clean(&raw);
            // A trailing extension-like word is the one thing a second pass still removes.
            prop_assume!(!RE_EXTENSION.is_match(&once));
            prop_assert_eq!(clean(&once), once);
        }

        #[test]
        fn year_after_whitespace_splits_title(
            words in prop::collection::vec(plain_word(), 1..5),
            sep in prop_oneof![Just(" "), Just("."), Just(" - ")],
            year in 1900u32..2100,
            suffix in prop_oneof![Just(""), Just(" 1080p"), Just(".BluRay.x264-GROUP"), Just(" WEB-DL")],
        ) {
            let raw = format!("{}{sep}{year}{suffix}", words.join(sep));
            let expected = words.join(" ").to_lowercase();
            prop_assert_eq!(parse(&raw), parsed(&expected, Some(year.to_string().as_str())));
        }

        #[test]
        fn nothing_detected_without_alphanumerics(raw in "\\PC{0,40}") {
            let result = parse(&raw);
            let detectable = clean(&raw).chars().any(char::is_alphanumeric);
            prop_assert_eq!(result.title.is_some(), detectable);
            if result.title.is_none() {
                prop_assert_eq!(result.year, None);
            }
        }

        #[test]
        fn bracket_and_punctuation_soup_is_undetected(raw in "[\\[\\](){}.:# -]{0,30}") {
            prop_assert_eq!(parse(&raw), ParsedFilename::default());
        }
    }
}
