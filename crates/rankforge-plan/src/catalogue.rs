//! DA target reference data: a baseline of high-authority generic domains
//! plus per-niche domains.
//!
//! The built-in tables are the default. A deployment can replace them with
//! a TOML file of the same shape:
//!
//! ```toml
//! [[baseline]]
//! domain = "medium.com"
//! da = 95
//! type = "guest_post"
//! difficulty = "medium"
//! contact_info = "Self-publish, submit to publications"
//!
//! [[niches]]
//! name = "Technology"
//! [[niches.targets]]
//! domain = "dev.to"
//! da = 83
//! type = "guest_post"
//! difficulty = "easy"
//! contact_info = "Community publishing"
//! ```

use std::path::Path;

use rankforge_core::{DaTarget, LinkDifficulty, LinkType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PlanError;

/// A catalogue domain before its cost range is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub domain: String,
    pub da: u8,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub difficulty: LinkDifficulty,
    #[serde(default)]
    pub contact_info: String,
}

impl CatalogueEntry {
    fn new(
        domain: &str,
        da: u8,
        link_type: LinkType,
        difficulty: LinkDifficulty,
        contact_info: &str,
    ) -> Self {
        Self {
            domain: domain.to_string(),
            da,
            link_type,
            difficulty,
            contact_info: contact_info.to_string(),
        }
    }

    /// Attach the `"$lo-$hi"` cost estimate.
    pub fn to_target(&self) -> DaTarget {
        let (lo, hi) = cost_range(self.da, self.difficulty);
        DaTarget {
            domain: self.domain.clone(),
            da: self.da,
            link_type: self.link_type,
            difficulty: self.difficulty,
            estimated_cost: format!("${lo}-${hi}"),
            contact_info: self.contact_info.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheTargets {
    pub name: String,
    pub targets: Vec<CatalogueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCatalogue {
    #[serde(default)]
    pub baseline: Vec<CatalogueEntry>,
    #[serde(default)]
    pub niches: Vec<NicheTargets>,
}

/// Cost range in whole dollars for one link from a domain.
///
/// `low = base + da * slope`, `high = 2 * low`, with base/slope of 50/2
/// (easy), 100/4 (medium) and 200/8 (hard).
pub fn cost_range(da: u8, difficulty: LinkDifficulty) -> (u64, u64) {
    let (base, slope) = match difficulty {
        LinkDifficulty::Easy => (50, 2),
        LinkDifficulty::Medium => (100, 4),
        LinkDifficulty::Hard => (200, 8),
    };
    let low = base + u64::from(da) * slope;
    (low, low * 2)
}

impl PlanCatalogue {
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let text = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalogue: Self = toml::from_str(&text).map_err(|source| PlanError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            baseline = catalogue.baseline.len(),
            niches = catalogue.niches.len(),
            "loaded plan catalogue"
        );
        Ok(catalogue)
    }

    /// Entries for `niche`, matched case-insensitively. Empty when unknown.
    pub fn niche_entries(&self, niche: &str) -> &[CatalogueEntry] {
        let needle = niche.trim().to_lowercase();
        self.niches
            .iter()
            .find(|n| n.name.trim().to_lowercase() == needle)
            .map(|n| n.targets.as_slice())
            .unwrap_or(&[])
    }

    /// Baseline followed by the niche's domains, costed. A domain listed in
    /// both appears once, at its baseline position.
    pub fn targets_for(&self, niche: &str) -> Vec<DaTarget> {
        let niche_entries = self.niche_entries(niche);
        if niche_entries.is_empty() {
            debug!(niche, "no niche-specific DA targets");
        }
        let mut targets: Vec<DaTarget> =
            Vec::with_capacity(self.baseline.len() + niche_entries.len());
        for entry in self.baseline.iter().chain(niche_entries) {
            if targets.iter().all(|t| t.domain != entry.domain) {
                targets.push(entry.to_target());
            }
        }
        targets
    }
}

impl Default for PlanCatalogue {
    #[rustfmt::skip]
    fn default() -> Self {
        use LinkDifficulty::{Easy, Hard, Medium};
        use LinkType::{Directory, GuestPost, Partnership, ResourcePage};

        let e = CatalogueEntry::new;
        let niche = |name: &str, targets: Vec<CatalogueEntry>| NicheTargets {
            name: name.to_string(),
            targets,
        };

        Self {
            baseline: vec![
                e("medium.com", 95, GuestPost, Easy, "Self-publish, then submit to publications"),
                e("linkedin.com", 98, GuestPost, Easy, "Publish articles from a company page"),
                e("quora.com", 93, ResourcePage, Easy, "Answer questions with a profile link"),
                e("crunchbase.com", 91, Directory, Medium, "Claim the company profile"),
                e("hubspot.com", 93, GuestPost, Hard, "Guest contributor program"),
                e("forbes.com", 94, GuestPost, Hard, "Forbes Councils membership"),
                e("entrepreneur.com", 92, GuestPost, Hard, "Contributor network application"),
            ],
            niches: vec![
                niche("Health & Wellness", vec![
                    e("mindbodygreen.com", 82, GuestPost, Medium, "Contributor pitch form"),
                    e("healthline.com", 92, ResourcePage, Hard, "Medical affairs outreach"),
                    e("wellandgood.com", 80, GuestPost, Medium, "Editorial team pitch"),
                ]),
                niche("Technology", vec![
                    e("dev.to", 83, GuestPost, Easy, "Community publishing"),
                    e("hackernoon.com", 86, GuestPost, Medium, "Writer application"),
                    e("techcrunch.com", 94, GuestPost, Hard, "Guest column submission"),
                ]),
                niche("Finance", vec![
                    e("investopedia.com", 92, ResourcePage, Hard, "Corrections and sources desk"),
                    e("nerdwallet.com", 90, Partnership, Hard, "Partnerships team"),
                    e("finextra.com", 76, GuestPost, Medium, "Community blog"),
                ]),
                niche("Travel", vec![
                    e("tripadvisor.com", 93, Directory, Easy, "Business listing"),
                    e("matadornetwork.com", 81, GuestPost, Medium, "Contributor program"),
                    e("lonelyplanet.com", 91, GuestPost, Hard, "Freelance writer pool"),
                ]),
                niche("Food & Cooking", vec![
                    e("allrecipes.com", 90, ResourcePage, Medium, "Recipe submission"),
                    e("food52.com", 84, GuestPost, Medium, "Community contributor"),
                    e("seriouseats.com", 88, GuestPost, Hard, "Editor pitch"),
                ]),
                niche("Fashion", vec![
                    e("lookbook.nu", 70, Directory, Easy, "Member profile"),
                    e("whowhatwear.com", 82, GuestPost, Hard, "Editorial pitch"),
                ]),
                niche("Home & Garden", vec![
                    e("houzz.com", 92, Directory, Easy, "Professional profile"),
                    e("apartmenttherapy.com", 88, GuestPost, Medium, "House tour submission"),
                    e("bhg.com", 89, ResourcePage, Hard, "Editorial outreach"),
                ]),
                niche("Sports & Fitness", vec![
                    e("strava.com", 83, Partnership, Medium, "Club and challenge partnerships"),
                    e("breakingmuscle.com", 72, GuestPost, Easy, "Contributor guidelines"),
                    e("runnersworld.com", 87, GuestPost, Hard, "Freelance pitch"),
                ]),
                niche("Education", vec![
                    e("edutopia.org", 85, GuestPost, Medium, "Guest blogger submission"),
                    e("khanacademy.org", 92, ResourcePage, Hard, "Content partnerships"),
                ]),
                niche("Entertainment", vec![
                    e("imdb.com", 95, Directory, Medium, "Title and company listing"),
                    e("screenrant.com", 88, GuestPost, Hard, "Writer application"),
                ]),
                niche("Business", vec![
                    e("bizjournals.com", 92, GuestPost, Hard, "Leadership trust application"),
                    e("smallbiztrends.com", 78, GuestPost, Medium, "Expert contributor form"),
                    e("clutch.co", 80, Directory, Easy, "Company profile"),
                ]),
                niche("Automotive", vec![
                    e("caranddriver.com", 88, ResourcePage, Hard, "Editorial outreach"),
                    e("autotrader.com", 87, Directory, Medium, "Dealer and service listing"),
                ]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_formula() {
        assert_eq!(cost_range(95, LinkDifficulty::Easy), (240, 480));
        assert_eq!(cost_range(91, LinkDifficulty::Medium), (464, 928));
        assert_eq!(cost_range(94, LinkDifficulty::Hard), (952, 1904));
        assert_eq!(cost_range(0, LinkDifficulty::Easy), (50, 100));
    }

    #[test]
    fn target_cost_string() {
        let t = CatalogueEntry::new(
            "medium.com",
            95,
            LinkType::GuestPost,
            LinkDifficulty::Easy,
            "",
        )
        .to_target();
        assert_eq!(t.estimated_cost, "$240-$480");
        assert_eq!(t.cost_low(), 240);
    }

    #[test]
    fn unknown_niche_gets_baseline_only() {
        let c = PlanCatalogue::default();
        assert!(c.niche_entries("Underwater Basket Weaving").is_empty());
        assert_eq!(
            c.targets_for("Underwater Basket Weaving").len(),
            c.baseline.len()
        );
    }

    #[test]
    fn niche_lookup_ignores_case() {
        let c = PlanCatalogue::default();
        let targets = c.targets_for("  technology ");
        assert_eq!(targets.len(), c.baseline.len() + 3);
        assert!(targets.iter().any(|t| t.domain == "dev.to"));
        // Baseline first.
        assert_eq!(targets[0].domain, "medium.com");
    }

    #[test]
    fn every_builtin_niche_has_targets() {
        let c = PlanCatalogue::default();
        assert_eq!(c.niches.len(), 12);
        assert!(c.niches.iter().all(|n| !n.targets.is_empty()));
    }

    #[test]
    fn duplicate_domain_kept_once() {
        let mut c = PlanCatalogue::default();
        c.niches[0].targets.push(c.baseline[0].clone());
        let targets = c.targets_for(&c.niches[0].name.clone());
        let count = targets.iter().filter(|t| t.domain == "medium.com").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn parses_toml_catalogue() {
        let c: PlanCatalogue = toml::from_str(
            r#"
            [[baseline]]
            domain = "example.org"
            da = 40
            type = "directory"
            difficulty = "easy"

            [[niches]]
            name = "Pets"
            [[niches.targets]]
            domain = "dogster.com"
            da = 70
            type = "partnership"
            difficulty = "medium"
            contact_info = "Partnerships inbox"
            "#,
        )
        .unwrap();
        assert_eq!(c.baseline[0].contact_info, "");
        let targets = c.targets_for("pets");
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1].estimated_cost, "$380-$760");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PlanCatalogue::load(Path::new("/nonexistent/catalogue.toml")).unwrap_err();
        assert!(matches!(err, PlanError::Io { .. }));
    }
}
