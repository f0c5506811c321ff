/// Keywords that mark a canton article as COVID-related.
///
/// Matching is exact-substring and case-sensitive on purpose: rather than
/// lowercasing titles, every case and accent variant the canton site is
/// known to use is listed explicitly. A variant missing from this list is a
/// false negative, which is the accepted trade-off.
pub const KEYWORDS: &[&str] = &[
    "COVID-19",
    "Covid-19",
    "covid-19",
    "COVID",
    "Covid",
    "covid",
    "CORONAVIRUS",
    "Coronavirus",
    "coronavirus",
    "CORONA",
    "Corona",
    "corona",
    "Epidémie",
    "Épidémie",
    "épidémie",
    "Règles",
    "règles",
    "Rules",
    "rules",
    "Vaccin",
    "vaccin",
    "Vaccination",
    "vaccination",
    "Confinement",
    "confinement",
    "Quatorzaine",
    "quatorzaine",
    "Quarantaine",
    "quarantaine",
    "Immunité",
    "immunité",
    "Distanciation",
    "distanciation",
    "Gestes barrières",
    "gestes barrières",
    "Cluster",
    "cluster",
    "Comorbidité",
    "comorbidité",
    "Asymptomatique",
    "asymptomatique",
    "Sanitaire",
    "sanitaire",
    "Grippe",
    "grippe",
];

/// True when the title contains at least one keyword as an exact substring.
pub fn is_relevant(title: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| title.contains(k))
}
