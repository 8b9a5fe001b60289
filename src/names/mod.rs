//! Structured name decomposition.
//!
//! A `NAME` fact records a display form with slash-delimited surnames
//! (`Robert /de Gliderow/`) and optional structured sub-facts (`GIVN`,
//! `SURN`, `NPFX`, `NSFX`, `NICK`). Decomposition produces one
//! `NameVariant` per surname: the display form as the record author wrote
//! it, and a surname-first sort key built from the structured parts.
//!
//! Sort keys normalize the Scottish `Mc`/`Mac ` prefixes to `Mac` and strip
//! recognized lower-case particles (`van `, `de `, `d'`, `'t `), so
//! `McDonald` and `MacDonald` interleave and `van Burén` sorts under `B`.
//! Display forms are never normalized.

use crate::config::EngineConfig;
use crate::models::Person;
use crate::record::{Fact, FactTree};
use itertools::Itertools;

/// Marker for an unknown surname inside a name string
const UNKNOWN_SURNAME: &str = "@N.N.";
/// Marker for an unknown given name inside a name string
const UNKNOWN_GIVEN: &str = "@P.N.";

/// One decomposition of one `NAME` fact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVariant {
    /// Given name, or the configured placeholder
    pub given: String,
    /// Sort-form surname: `SURN` sub-fact or slash segment, particles
    /// stripped, `Mc`/`Mac ` normalized
    pub surname: String,
    /// Surname span exactly as written in the display string
    pub full_surname: String,
    /// Display string with slashes removed and placeholders resolved
    pub display: String,
    /// Surname-first sort key (`SURNAME,GIVEN`)
    pub sort: String,
}

/// Decompose one `NAME` fact into its variants, one per surname.
///
/// A fact with a comma-separated `SURN` list, or multiple slash-delimited
/// segments, yields several variants sharing the given name and display
/// string and differing in surname and sort key.
#[must_use]
pub fn decompose(tree: &FactTree, name_fact: &Fact, config: &EngineConfig) -> Vec<NameVariant> {
    let npfx = tree.sub_value(name_fact, "NPFX").unwrap_or("");
    let givn = tree.sub_value(name_fact, "GIVN").unwrap_or("");
    let surn = tree.sub_value(name_fact, "SURN").unwrap_or("");
    let nsfx = tree.sub_value(name_fact, "NSFX").unwrap_or("");
    let nick = tree.sub_value(name_fact, "NICK").unwrap_or("");

    decompose_parts(&name_fact.value, npfx, givn, surn, nsfx, nick, config)
}

/// The variants for a person with no usable `NAME` fact: both placeholder
/// tokens, so the record still sorts deterministically and displays a
/// documented default
#[must_use]
pub fn fallback_variants(config: &EngineConfig) -> Vec<NameVariant> {
    decompose_parts("@P.N. /@N.N./", "", "", "", "", "", config)
}

/// All name variants of a person, in record order; cached on the person
pub fn person_names<'a>(person: &'a Person, config: &EngineConfig) -> &'a [NameVariant] {
    person.names.get_or_init(|| {
        let tree = person.facts();
        let variants: Vec<NameVariant> = tree
            .facts_with_tag(&["NAME"])
            .flat_map(|fact| decompose(tree, fact, config))
            .collect();
        if variants.is_empty() {
            fallback_variants(config)
        } else {
            variants
        }
    })
}

/// The person's primary name: the first variant of the first `NAME` fact
pub fn best_name<'a>(person: &'a Person, config: &EngineConfig) -> &'a NameVariant {
    &person_names(person, config)[0]
}

fn decompose_parts(
    full: &str,
    npfx: &str,
    givn: &str,
    surn: &str,
    nsfx: &str,
    nick: &str,
    config: &EngineConfig,
) -> Vec<NameVariant> {
    let mut full = full.trim().to_string();

    // An odd slash count means an unterminated surname: close it
    if full.matches('/').count() % 2 == 1 {
        full.push('/');
    }
    // "//" denotes an unknown surname
    full = full.replace("//", &format!("/{UNKNOWN_SURNAME}/"));

    // The surname span runs from the first slash to the last, as written
    let full_surname = match (full.find('/'), full.rfind('/')) {
        (Some(first), Some(last)) if first < last => {
            full[first + 1..last].replace('/', "")
        }
        _ => String::new(),
    };

    // Sortable surnames: explicit comma-separated SURN wins, else each
    // slash-delimited segment with lower-case particles stripped
    let mut surnames: Vec<String> = if surn.is_empty() {
        let segments: Vec<String> = slash_segments(&full)
            .into_iter()
            .map(|segment| strip_particles(&segment).to_string())
            .collect();
        if segments.is_empty() {
            // It is valid to have no surname at all
            vec![String::new()]
        } else {
            segments
        }
    } else {
        surn.split(',').map(|part| part.trim().to_string()).collect()
    };

    // Given name: explicit sub-fact wins, else the display string minus
    // surname segments and quoted nicknames
    let mut given = if givn.is_empty() {
        derive_given(&full)
    } else {
        givn.split(',').map(str::trim).join(" ")
    };

    if given.is_empty() {
        given = UNKNOWN_GIVEN.to_string();
        match full.find('/') {
            Some(pos) => full.insert_str(pos, &format!("{UNKNOWN_GIVEN} ")),
            None => full = UNKNOWN_GIVEN.to_string(),
        }
    }

    // Prefix/suffix sub-facts may be present without appearing in the
    // display string
    if !npfx.is_empty() && !full.starts_with(&format!("{npfx} ")) {
        full = format!("{npfx} {full}");
    }
    if !nsfx.is_empty() && !full.ends_with(&format!(" {nsfx}")) {
        full = format!("{full} {nsfx}");
    }

    // A tagged nickname is inserted in quotes before the surname, unless
    // the display string already quotes it verbatim
    if !nick.is_empty() {
        let quoted = format!("\"{nick}\"");
        if !full.contains(&quoted) {
            match full.find('/') {
                Some(pos) => full.insert_str(pos, &format!("{quoted} ")),
                None => full = format!("{full} {quoted}"),
            }
        }
    }

    // Slashes and preferred-name markers never display
    let display = resolve_placeholders(
        &full.replace('/', "").replace('*', ""),
        config,
    );
    let display = collapse_spaces(&display);
    let given = given.replace('*', "");

    for surname in &mut surnames {
        *surname = normalize_mac(surname);
    }

    surnames
        .into_iter()
        .map(|surname| {
            let sort = resolve_placeholders(&format!("{surname},{given}"), config);
            NameVariant {
                given: resolve_placeholders(&given, config),
                surname: resolve_placeholders(&surname, config),
                full_surname: resolve_placeholders(&full_surname, config),
                display: display.clone(),
                sort,
            }
        })
        .collect()
}

/// The slash-delimited segments of a display string, in order
fn slash_segments(full: &str) -> Vec<String> {
    full.split('/')
        .enumerate()
        .filter(|&(index, _)| index % 2 == 1)
        .map(|(_, segment)| segment.to_string())
        .collect()
}

/// Strip recognized lower-case surname particles (`van `, `de la `, `d'`,
/// `'t `) from the front of a surname. Sort form only; the display keeps
/// the particles.
fn strip_particles(surname: &str) -> &str {
    let mut rest = surname;
    loop {
        let stripped = strip_one_particle(rest);
        if stripped.len() == rest.len() {
            return rest;
        }
        rest = stripped;
    }
}

fn strip_one_particle(rest: &str) -> &str {
    // 't Hoen, d'Arcy style: leading apostrophe or trailing apostrophe
    if let Some(after) = rest.strip_prefix('\'') {
        let word_len = after.chars().take_while(|c| c.is_ascii_lowercase()).count();
        if word_len > 0 {
            if let Some(tail) = after[word_len..].strip_prefix(' ') {
                return tail;
            }
        }
        return rest;
    }
    let word_len = rest.chars().take_while(|c| c.is_ascii_lowercase()).count();
    if word_len == 0 {
        return rest;
    }
    let tail = &rest[word_len..];
    if let Some(tail) = tail.strip_prefix(' ') {
        return tail;
    }
    if let Some(tail) = tail.strip_prefix('\'') {
        return tail.strip_prefix(' ').unwrap_or(tail);
    }
    rest
}

/// Case-insensitive `Mc` and `Mac ` prefixes both sort under `Mac`
fn normalize_mac(surname: &str) -> String {
    let lower = surname.to_ascii_lowercase();
    if lower.starts_with("mac ") {
        format!("Mac{}", &surname[4..])
    } else if lower.starts_with("mc") {
        format!("Mac{}", &surname[2..])
    } else {
        surname.to_string()
    }
}

/// Derive a given name from the display string by removing surname
/// segments and quoted nicknames
fn derive_given(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut in_surname = false;
    let mut in_quote = false;
    for c in full.chars() {
        match c {
            '/' => {
                in_surname = !in_surname;
                out.push(' ');
            }
            '"' => {
                in_quote = !in_quote;
                out.push(' ');
            }
            _ if in_surname || in_quote => {}
            _ => out.push(c),
        }
    }
    collapse_spaces(&out)
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().join(" ")
}

fn resolve_placeholders(text: &str, config: &EngineConfig) -> String {
    text.replace(UNKNOWN_SURNAME, &config.unknown_surname)
        .replace(UNKNOWN_GIVEN, &config.unknown_given_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn variants(full: &str, extra: &str) -> Vec<NameVariant> {
        let raw = format!("0 @I1@ INDI\n1 NAME {full}\n{extra}");
        let tree = FactTree::parse(&raw);
        let name = tree.facts_with_tag(&["NAME"]).next().unwrap().clone();
        decompose(&tree, &name, &config())
    }

    #[test]
    fn structured_surname_wins_over_the_display_form() {
        let variants = variants(
            "Robert /de Gliderow/",
            "2 GIVN Robert\n2 SPFX de\n2 SURN CLITHEROW\n2 NICK The Bald\n",
        );
        assert_eq!(variants.len(), 1);
        let name = &variants[0];
        assert_eq!(name.given, "Robert");
        assert_eq!(name.surname, "CLITHEROW");
        assert_eq!(name.sort, "CLITHEROW,Robert");
        assert_eq!(name.display, "Robert de Gliderow \"The Bald\"");
    }

    #[test]
    fn multiple_slash_surnames_yield_one_variant_each() {
        let variants = variants("Carlos /Vasquez/ y /Sante/", "");
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].surname, "Vasquez");
        assert_eq!(variants[1].surname, "Sante");
        assert!(variants.iter().all(|v| v.given == "Carlos"));
        assert!(variants.iter().all(|v| v.display == "Carlos Vasquez y Sante"));
        assert_eq!(variants[0].full_surname, "Vasquez y Sante");
    }

    #[test]
    fn comma_separated_surn_list_yields_one_variant_each() {
        let variants = variants("Carlos /Vasquez y Sante/", "2 SURN Vasquez,Sante\n");
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].sort, "Vasquez,Carlos");
        assert_eq!(variants[1].sort, "Sante,Carlos");
    }

    #[test]
    fn particles_are_stripped_for_sort_only() {
        let variants = variants("Jan /van Burén/", "");
        assert_eq!(variants[0].surname, "Burén");
        assert_eq!(variants[0].display, "Jan van Burén");
    }

    #[test]
    fn mc_and_mac_sort_identically_display_unchanged() {
        let mc = variants("Alasdair /McDonald/", "");
        let mac = variants("Alasdair /MacDonald/", "");
        assert_eq!(mc[0].sort, mac[0].sort);
        assert_eq!(mc[0].display, "Alasdair McDonald");
        assert_eq!(mac[0].display, "Alasdair MacDonald");
    }

    #[test]
    fn unknown_parts_become_placeholders_in_display_and_sort() {
        let variants = variants("//", "");
        let name = &variants[0];
        assert_eq!(name.given, "Unknown");
        assert_eq!(name.surname, "N.N.");
        assert_eq!(name.display, "Unknown N.N.");
        assert_eq!(name.sort, "N.N.,Unknown");
        assert!(!name.sort.is_empty());
    }

    #[test]
    fn unterminated_surname_slash_is_repaired() {
        let variants = variants("John/Smith", "");
        assert_eq!(variants[0].surname, "Smith");
        assert_eq!(variants[0].given, "John");
    }

    #[test]
    fn tagged_nickname_is_not_duplicated_when_already_quoted() {
        let variants = variants("Robert \"Bob\" /Smith/", "2 NICK Bob\n");
        assert_eq!(variants[0].display.matches("Bob").count(), 1);
    }

    #[test]
    fn no_surname_at_all_is_valid() {
        let variants = variants("Pocahontas", "");
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].surname, "");
        assert_eq!(variants[0].given, "Pocahontas");
        assert_eq!(variants[0].sort, ",Pocahontas");
    }
}
