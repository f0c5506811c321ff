/// URLs and element selectors for the two scraped pages, kept as data so the
/// detector and extraction logic can run against fixtures.
///
/// The selectors mirror the page structure of the live sites and are the
/// first thing to update when a scrape starts failing.
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// Canton news listing page (novelty-detection source).
    pub canton_url: String,
    /// COVID statistics tracker page.
    pub stats_url: String,

    /// Date of the most recent article on the canton page.
    pub article_date: String,
    /// Title of the most recent article on the canton page.
    pub article_title: String,

    /// Yesterday's new-case count on the stats page.
    pub new_cases: String,
    /// Total laboratory-confirmed cases.
    pub total_cases: String,
    /// Total recovered cases.
    pub total_recovered: String,
    /// Total deaths.
    pub total_deaths: String,
}

impl Default for SourceTable {
    fn default() -> Self {
        Self {
            canton_url: "https://www.vd.ch".to_string(),
            stats_url: "https://www.coronatracker.com/fr/country/switzerland".to_string(),

            article_date: "#c2000016 article:first-of-type header p time".to_string(),
            article_title: "#c2000016 article:first-of-type header h3 a".to_string(),

            new_cases: "main .country-summary > div:nth-of-type(1) p:nth-of-type(3)".to_string(),
            total_cases: "main .country-summary > div:nth-of-type(1) p:nth-of-type(1)".to_string(),
            total_recovered: "main .country-summary > div:nth-of-type(2) p:nth-of-type(1)"
                .to_string(),
            total_deaths: "main .country-summary > div:nth-of-type(3) p:nth-of-type(1)"
                .to_string(),
        }
    }
}
