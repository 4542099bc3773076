//! Render model for the detail panel injected next to a search result.

use serde::Serialize;

use crate::lookup::DisplayMovie;

/// Everything the page needs to draw a movie panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub title: String,
    pub year: Option<String>,
    pub overview: String,
    /// Genre names joined as a sentence, e.g. "Action, Comedy and Drama".
    pub genres: String,
    pub rating: f64,
    pub vote_count: u64,
    /// Display name of the original language, e.g. "English".
    pub language: String,
    /// The filename the row was detected from.
    pub filename: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

impl MovieCard {
    pub fn render(
        movie: &DisplayMovie,
        genre_names: &[String],
        language_name: &str,
        filename: &str,
        locale: &Locale,
    ) -> Self {
        Self {
            title: movie.movie.title.clone(),
            year: movie.year.clone(),
            overview: movie.movie.overview.clone(),
            genres: locale.format_list(genre_names),
            rating: movie.movie.vote_average,
            vote_count: movie.movie.vote_count,
            language: language_name.to_string(),
            filename: filename.to_string(),
            poster_url: movie.poster_url.clone(),
            backdrop_url: movie.backdrop_url.clone(),
        }
    }
}

/// A BCP 47 style tag such as `en-AU`, reduced to what list joining needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::parse(crate::lookup::DEFAULT_LANGUAGE)
    }
}

impl Locale {
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.split(['-', '_']).filter(|p| !p.is_empty());
        let language = parts
            .next()
            .map(|l| l.to_ascii_lowercase())
            .unwrap_or_else(|| "en".to_string());
        let region = parts
            .find(|p| p.len() == 2 || p.chars().all(|c| c.is_ascii_digit()))
            .map(|r| r.to_ascii_uppercase());
        Self { language, region }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Join items as a "conjunction" list in this locale.
    pub fn format_list(&self, items: &[String]) -> String {
        let conjunction = self.conjunction();
        match items {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => format!("{first} {conjunction} {second}"),
            [init @ .., last] => {
                let head = init.join(", ");
                if self.serial_comma() {
                    format!("{head}, {conjunction} {last}")
                } else {
                    format!("{head} {conjunction} {last}")
                }
            }
        }
    }

    fn conjunction(&self) -> &'static str {
        match self.language.as_str() {
            "de" => "und",
            "fr" => "et",
            "es" => "y",
            "it" | "pt" => "e",
            "nl" => "en",
            "sv" => "och",
            "da" | "nb" | "no" => "og",
            "fi" => "ja",
            "pl" => "i",
            _ => "and",
        }
    }

    // American English writes "A, B, and C"; other English regions drop the last comma.
    fn serial_comma(&self) -> bool {
        match self.language.as_str() {
            "en" => matches!(self.region.as_deref(), None | Some("US")),
            _ => false,
        }
    }

    /// Display name of an ISO 639-1 code in this locale's language.
    ///
    /// Codes outside the localized tables get their English name; unknown
    /// codes come back as given.
    pub fn language_name(&self, code: &str) -> String {
        let code = code.trim().to_ascii_lowercase();
        let display = match self.language.as_str() {
            "no" => "nb",
            other => other,
        };

        let localized = LOCALIZED_NAMES
            .iter()
            .find(|(lang, _)| *lang == display)
            .and_then(|(_, names)| {
                COMMON_CODES
                    .iter()
                    .position(|c| *c == code)
                    .map(|i| names[i])
            });

        localized
            .or_else(|| {
                LANGUAGE_NAMES
                    .iter()
                    .find(|(c, _)| *c == code)
                    .map(|(_, name)| *name)
            })
            .map(str::to_string)
            .unwrap_or(code)
    }
}

// Original languages common on TMDB; each row of `LOCALIZED_NAMES` follows this order.
const COMMON_CODES: [&str; 20] = [
    "en", "fr", "de", "es", "it", "ja", "ko", "zh", "cn", "hi", "ru", "pt", "sv", "da", "no",
    "nb", "fi", "pl", "nl", "tr",
];

#[rustfmt::skip]
static LOCALIZED_NAMES: &[(&str, [&str; 20])] = &[
    ("de", ["Englisch", "Französisch", "Deutsch", "Spanisch", "Italienisch", "Japanisch", "Koreanisch", "Chinesisch", "Kantonesisch", "Hindi", "Russisch", "Portugiesisch", "Schwedisch", "Dänisch", "Norwegisch", "Norwegisch (Bokmål)", "Finnisch", "Polnisch", "Niederländisch", "Türkisch"]),
    ("fr", ["anglais", "français", "allemand", "espagnol", "italien", "japonais", "coréen", "chinois", "cantonais", "hindi", "russe", "portugais", "suédois", "danois", "norvégien", "norvégien bokmål", "finnois", "polonais", "néerlandais", "turc"]),
    ("es", ["inglés", "francés", "alemán", "español", "italiano", "japonés", "coreano", "chino", "cantonés", "hindi", "ruso", "portugués", "sueco", "danés", "noruego", "noruego bokmal", "finés", "polaco", "neerlandés", "turco"]),
    ("it", ["inglese", "francese", "tedesco", "spagnolo", "italiano", "giapponese", "coreano", "cinese", "cantonese", "hindi", "russo", "portoghese", "svedese", "danese", "norvegese", "norvegese bokmål", "finlandese", "polacco", "olandese", "turco"]),
    ("pt", ["inglês", "francês", "alemão", "espanhol", "italiano", "japonês", "coreano", "chinês", "cantonês", "híndi", "russo", "português", "sueco", "dinamarquês", "norueguês", "norueguês bokmål", "finlandês", "polonês", "holandês", "turco"]),
    ("nl", ["Engels", "Frans", "Duits", "Spaans", "Italiaans", "Japans", "Koreaans", "Chinees", "Kantonees", "Hindi", "Russisch", "Portugees", "Zweeds", "Deens", "Noors", "Noors - Bokmål", "Fins", "Pools", "Nederlands", "Turks"]),
    ("sv", ["engelska", "franska", "tyska", "spanska", "italienska", "japanska", "koreanska", "kinesiska", "kantonesiska", "hindi", "ryska", "portugisiska", "svenska", "danska", "norska", "norskt bokmål", "finska", "polska", "nederländska", "turkiska"]),
    ("da", ["engelsk", "fransk", "tysk", "spansk", "italiensk", "japansk", "koreansk", "kinesisk", "kantonesisk", "hindi", "russisk", "portugisisk", "svensk", "dansk", "norsk", "norsk bokmål", "finsk", "polsk", "nederlandsk", "tyrkisk"]),
    ("nb", ["engelsk", "fransk", "tysk", "spansk", "italiensk", "japansk", "koreansk", "kinesisk", "kantonesisk", "hindi", "russisk", "portugisisk", "svensk", "dansk", "norsk", "norsk bokmål", "finsk", "polsk", "nederlandsk", "tyrkisk"]),
    ("fi", ["englanti", "ranska", "saksa", "espanja", "italia", "japani", "korea", "kiina", "kantoninkiina", "hindi", "venäjä", "portugali", "ruotsi", "tanska", "norja", "norjan bokmål", "suomi", "puola", "hollanti", "turkki"]),
    ("pl", ["angielski", "francuski", "niemiecki", "hiszpański", "włoski", "japoński", "koreański", "chiński", "kantoński", "hindi", "rosyjski", "portugalski", "szwedzki", "duński", "norweski", "norweski (bokmål)", "fiński", "polski", "niderlandzki", "turecki"]),
];

static LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bangla"),
    ("ca", "Catalan"),
    ("cn", "Cantonese"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("ml", "Malayalam"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("nb", "Norwegian Bokmål"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];
