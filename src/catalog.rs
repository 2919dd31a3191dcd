use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Interview profiles
// ---------------------------------------------------------------------------

/// One interviewed respondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Display key, e.g. "Zoé, 18 ans, Lycéenne STI2D".
    pub name: String,
    pub context: String,
    pub objective: String,
    pub quotes: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("profile not found: {key}")]
    KeyNotFound { key: String },

    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Static qualitative content: interview profiles plus a closing synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub synthesis: String,
}

impl Catalog {
    /// Read a catalog from a JSON file of the form
    /// `{ "profiles": [{ "name", "context", "objective", "quotes" }], "synthesis": "..." }`.
    pub fn from_json(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Profile names in display order, for the selector.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn lookup(&self, key: &str) -> Result<&Profile, CatalogError> {
        self.profiles
            .iter()
            .find(|p| p.name == key)
            .ok_or_else(|| CatalogError::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// The interviews collected for the "Data challenge" survey.
    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|(name, context, objective, quotes)| Profile {
                name: name.to_string(),
                context: context.to_string(),
                objective: objective.to_string(),
                quotes: quotes.iter().map(|q| q.to_string()).collect(),
            })
            .collect();
        Catalog {
            profiles,
            synthesis: BUILTIN_SYNTHESIS.trim().to_string(),
        }
    }
}

type ProfileRow = (&'static str, &'static str, &'static str, &'static [&'static str]);

const BUILTIN_PROFILES: &[ProfileRow] = &[
    (
        "Émilie, 20 ans, BAC Pro Maintenance",
        "Émilie termine son bac pro et hésite à postuler dans le luxe",
        "Comprendre les freins des profils techniques non diplômés du supérieur",
        &[
            "En CFA on nous parle jamais du luxe J’pensais qu’ils prenaient que des ingénieurs Un prof m’a dit que LV recrute des techniciens mais j’ose pas Si y’avait des portes ouvertes dans leurs ateliers j’irais",
            "Mon stage chez un sous-traitant auto c’était que de la routine Si LV propose des formations pour monter en compétences ça m’motiverait",
        ],
    ),
    (
        "Raj, 24 ans, Master Logistique (Inde)",
        "Raj cherche un stage en Europe et s’interroge sur le luxe",
        "Explorer l’attractivité internationale des métiers Supply Chain",
        &[
            "En Inde Louis Vuitton est un rêve Mais je ne savais pas qu’ils avaient des usines en Europe Leur site indien ne mentionne pas ces métiers",
            "Si LV organisait des webinaires en anglais pour expliquer leurs défis logistiques globaux je postulerais Mais leurs offres sont trop franco françaises",
        ],
    ),
    (
        "Hugo, 28 ans, reconversion tech",
        "Hugo quitte la tech pour se rapprocher de l’artisanat",
        "Capter l’intérêt des profils en reconversion",
        &[
            "J’ai démissionné d’une startup pour retrouver du concret LV m’intéresse car ils mélangent artisanat et industrie Mais comment postuler sans expérience luxe",
            "Leurs offres demandent 5 ans d’expérience en maroquinerie Pourquoi pas des programmes pour reconvertis motivés",
        ],
    ),
    (
        "Fatima, 22 ans, BTS Qualité (handicap)",
        "Fatima cherche une entreprise inclusive pour son alternance",
        "Évaluer l’accessibilité des métiers industriels",
        &[
            "J’ai peur que les ateliers de LV ne soient pas adaptés aux fauteuils roulants Leur site parle de diversité mais montre t il des employés en situation de handicap",
            "Si LV collaborait avec mon école pour aménager des postes ça montrerait un vrai engagement",
        ],
    ),
    (
        "Nathan, 26 ans, entrepreneur upcycling",
        "Nathan crée des vêtements à partir de déchets industriels",
        "Explorer les synergies entre luxe et économie circulaire",
        &[
            "LV a un programme de récupération de chutes de cuir mais c’est confidentiel Pourquoi ne pas en faire un argument pour attirer des profils écolos comme moi",
            "Travailler chez eux pour repenser leur supply chain en mode zéro déchet Oui mais seulement s’ils ont une vraie volonté de changer",
        ],
    ),
    (
        "Lise, 19 ans, Licence design mode",
        "Lise grandit dans un atelier familial et méprise l’industrie",
        "Comprendre le clivage artisanat vs production de masse",
        &[
            "Mon père répare des sacs LV vintage Il dit Avant c’était fait pour durer Maintenant c’est de la production en série",
            "Si LV m’expliquait comment ils forment leurs artisans et préservent la qualité je reconsidererais Mais j’ai peur que l’industrie tue le savoir faire",
        ],
    ),
    (
        "Marco, 30 ans, Livreur en reprise d’études",
        "Marco reprend un BTS Logistique après une carrière dans la restauration",
        "Capter les attentes des profils non traditionnels",
        &[
            "J’ai postulé chez Amazon mais leurs entrepôts sont des mouroirs LV j’imagine que c’est mieux Mais comment le savoir Y’a rien sur Glassdoor",
            "Si LV proposait des stages découverte pour adultes en reconversion j’serais preneur Mais leurs offres s’adressent aux moins de 25 ans",
        ],
    ),
    (
        "Aïda, 27 ans, consultante digital nomade",
        "Aïda travaille à distance et s’intéresse aux supply chains connectées",
        "Attirer les profils tech adeptes de flexibilité",
        &[
            "Je pourrais optimiser leurs flux depuis Bali mais LV a l’air trop rigide Leur mention présentiel obligatoire dans les offres me refroidit",
            "S’ils digitalisaient leurs processus et permettaient le télétravail partiel je les verrais comme un employeur innovant",
        ],
    ),
    (
        "Thomas, 35 ans, reconversion professionnelle",
        "Thomas quitte la construction pour chercher un métier stable",
        "Comprendre l’attrait des métiers industriels pour les profils matures",
        &[
            "À mon âge je cherche la stabilité LV est une entreprise solide mais j’ai l’impression qu’ils privilégient les jeunes diplômés",
            "Si LV communiquait sur les parcours internes genre Devenez chef d’atelier en 5 ans ça donnerait espoir aux trentenaires comme moi",
        ],
    ),
    (
        "Zoé, 18 ans, Lycéenne STI2D",
        "Zoé choisit son orientation post bac",
        "Capter les jeunes talents dès le lycée",
        &[
            "En cours on visite des usines automobiles jamais des ateliers de luxe Si LV organisait des journées Découverte métiers pour lycéens je m’inscrirais",
            "Mes potes pensent que l’industrie c’est pour les garçons Si LV montrait des femmes ingénieures ou cheffes d’atelier ça casserait les clichés",
        ],
    ),
];

const BUILTIN_SYNTHESIS: &str = "
Les interviews révèlent un manque d’information sur les métiers industriels et supply chain chez Louis Vuitton, des freins liés à l’image élitiste et à l’accessibilité, et une forte attente de preuves concrètes d’engagement (RSE, diversité, formation, mobilité interne).
Conseils principaux :
- Diversifier la communication RH, cibler les lycées pros, CFA, profils en reconversion, personnes en situation de handicap et talents internationaux
- Organiser des journées portes ouvertes, visites virtuelles, webinaires et stages découverte pour rendre les métiers concrets
- Publier des résultats concrets sur la durabilité, l’économie circulaire, l’accessibilité et la diversité, avec des témoignages d’employés
- Développer des programmes spécifiques pour les reconvertis, adultes en reprise d’études et profils internationaux, avec formation interne et mentorat
- Mettre en avant l’innovation, la digitalisation, la collaboration entre métiers et la dimension internationale de la supply chain
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_has_ten_profiles_with_quotes() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.profiles.len(), 10);
        assert!(catalog.profiles.iter().all(|p| p.quotes.len() == 2));
        assert!(catalog.synthesis.starts_with("Les interviews"));
    }

    #[test]
    fn every_listed_name_can_be_looked_up() {
        let catalog = Catalog::builtin();
        for name in catalog.names() {
            assert_eq!(catalog.lookup(name).unwrap().name, name);
        }
    }

    #[test]
    fn unknown_key_is_key_not_found() {
        let catalog = Catalog::builtin();
        match catalog.lookup("Personne") {
            Err(CatalogError::KeyNotFound { key }) => assert_eq!(key, "Personne"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn loads_catalog_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"profiles": [{{"name": "Ana", "context": "c", "objective": "o", "quotes": ["q"]}}]}}"#
        )
        .unwrap();

        let catalog = Catalog::from_json(file.path()).unwrap();
        assert_eq!(catalog.lookup("Ana").unwrap().quotes, vec!["q"]);
        assert!(catalog.synthesis.is_empty());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        assert!(matches!(
            Catalog::from_json(file.path()),
            Err(CatalogError::Parse { .. })
        ));
    }
}
