//! Curated value lists for plausible field content.
//!
//! All selection is driven by the caller's `SynthRng`, so the same
//! seed yields the same names, merchants, and addresses.

use crate::rng::SynthRng;

pub struct NamePool;

impl NamePool {
    pub fn full_name(rng: &mut SynthRng) -> String {
        format!("{} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES))
    }

    /// Lower-cased `first.last` plus a numeric disambiguator, so two
    /// customers sharing a name never share an email.
    pub fn email_for(name: &str, rng: &mut SynthRng) -> String {
        let user: String = name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(".");
        let n = rng.next_u64_below(10_000);
        format!("{user}{n}@{}", rng.pick(EMAIL_DOMAINS))
    }

    pub fn phone(rng: &mut SynthRng) -> String {
        format!(
            "+1-{:03}-{:03}-{:04}",
            200 + rng.next_u64_below(800),
            rng.next_u64_below(1000),
            rng.next_u64_below(10_000)
        )
    }

    pub fn street_address(rng: &mut SynthRng) -> String {
        format!(
            "{} {} {}, {}",
            1 + rng.next_u64_below(9999),
            rng.pick(STREET_NAMES),
            rng.pick(STREET_SUFFIXES),
            rng.pick(CITIES)
        )
    }

    pub fn merchant(rng: &mut SynthRng) -> String {
        format!(
            "{} {} {}",
            rng.pick(MERCHANT_PREFIXES),
            rng.pick(MERCHANT_TRADES),
            rng.pick(MERCHANT_SUFFIXES)
        )
    }

    pub fn description(rng: &mut SynthRng) -> String {
        format!("{} {}", rng.pick(DESC_VERBS), rng.pick(DESC_OBJECTS))
    }
}

const FIRST_NAMES: &[&str] = &[
    "Liam", "Olivia", "Noah", "Amelia", "Elias", "Maren", "Theo", "Clara", "Felix", "Ingrid",
    "Marcus", "Elena", "Victor", "Sofia", "Hugo", "Freya", "Oscar", "Lena", "Ivan", "Nadia",
    "Pablo", "Carmen", "Dmitri", "Aisha", "Kenji", "Yuki", "Ravi", "Priya", "Omar", "Layla",
    "Sean", "Maeve", "Lars", "Astrid", "Mateo", "Lucia", "Jonas", "Greta", "Emil", "Vera",
    "Caleb", "Ruth", "Silas", "Edith", "Reuben", "Flora", "Abel", "Iris", "Jude", "Hazel",
];

const LAST_NAMES: &[&str] = &[
    "Halvorsen", "Okafor", "Lindqvist", "Marchetti", "Duarte", "Novak", "Sorensen", "Takahashi",
    "Beaumont", "Kowalski", "Fitzgerald", "Vasquez", "Andersen", "Moreau", "Castellano",
    "Virtanen", "Brennan", "Ivanova", "Schreiber", "Olsen", "Delgado", "Petrov", "Larsson",
    "Moretti", "Navarro", "Janssen", "Whitfield", "Arnesen", "Caldwell", "Dubois", "Eriksson",
    "Farrow", "Galindo", "Holloway", "Iversen", "Jenott", "Kessler", "Lombardi", "Mercer",
    "Nystrom", "Oberg", "Paquette", "Quinlan", "Rasmussen", "Stendahl", "Thorne", "Ulrich",
    "Vance", "Wexler", "Zielinski",
];

const EMAIL_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "mailbox.test",
    "post.test",
    "inbox.test",
];

const STREET_NAMES: &[&str] = &[
    "Harbor", "Birchwood", "Meridian", "Caldera", "Foxglove", "Alder", "Juniper", "Copperfield",
    "Lakeview", "Sycamore", "Granite", "Willowbrook", "Hawthorn", "Bellweather", "Clearwater",
];

const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Blvd", "Ln", "Rd", "Way", "Terrace"];

const CITIES: &[&str] = &[
    "Springfield", "Rivermouth", "Kingsport", "Vallejo Heights", "North Arbor", "Dunmore",
    "East Callow", "Pinefield", "Westmere", "Larkspur",
];

const MERCHANT_PREFIXES: &[&str] = &[
    "Summit", "Harborline", "Redwood", "Cascade", "Ironbridge", "Bluecrest", "Northgate",
    "Stonepath", "Silverbirch", "Eastfield",
];

const MERCHANT_TRADES: &[&str] = &[
    "Grocers", "Hardware", "Coffee", "Books", "Electronics", "Apparel", "Pharmacy", "Bistro",
    "Garden", "Cycles", "Optics", "Bakery",
];

const MERCHANT_SUFFIXES: &[&str] = &["Co", "Ltd", "LLC", "Group", "Supply", "Market"];

const DESC_VERBS: &[&str] = &[
    "Card purchase", "Online payment", "Recurring charge", "Counter withdrawal",
    "Standing order", "Direct debit", "Branch deposit", "Mobile transfer",
];

const DESC_OBJECTS: &[&str] = &[
    "ref 2231", "weekly", "monthly plan", "invoice settlement", "subscription renewal",
    "household", "one-off", "scheduled",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_generation_is_deterministic() {
        let mut a = SynthRng::new(12345);
        let mut b = SynthRng::new(12345);
        assert_eq!(NamePool::full_name(&mut a), NamePool::full_name(&mut b));
    }

    #[test]
    fn emails_are_well_formed() {
        let mut rng = SynthRng::new(5);
        for _ in 0..50 {
            let name = NamePool::full_name(&mut rng);
            let email = NamePool::email_for(&name, &mut rng);
            assert!(email.contains('@'), "bad email: {email}");
            assert!(!email.contains(' '), "email has spaces: {email}");
        }
    }

    #[test]
    fn merchants_have_three_parts() {
        let mut rng = SynthRng::new(9);
        for _ in 0..20 {
            let m = NamePool::merchant(&mut rng);
            assert_eq!(m.split_whitespace().count(), 3, "merchant: {m}");
        }
    }
}
