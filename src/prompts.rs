//! Extraction prompts for floor-plan analysis.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the `surface_*` key convention the
//!    normalizer relies on is defined by these prompts; changing the
//!    vocabulary means editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompts directly without
//!    calling a real model, so a regression that drops the key convention or
//!    the decimal-separator rule is caught immediately.
//!
//! The prompts are written in French: the plans this service reads are
//! French marketing floor plans, and the canonical room vocabulary
//! (`Entrée`, `Séjour`, `Dégagement`, ...) is part of the extraction
//! contract.

/// Prompt sent alongside the rasterised page-1 image (vision strategy).
///
/// Asks for one JSON object using the `surface_*` key convention, plus the
/// document-orientation reading from the compass rose.
pub const VISION_PROMPT: &str = r#"Analysez cette image de plan d'appartement ou de maison et extrayez toutes les informations suivantes :

1. Type de bien :
- Identifiez s'il s'agit d'un appartement ou d'une maison
- Si c'est un appartement :
  * Cherchez la typologie (T2, T3, T4, etc.) qui est généralement indiquée sur le plan
  * Identifiez l'étage (RDC, R+1, R+2, etc.) qui est indiqué sur le plan
  * Retournez le type sous la forme "Appartement T3 - RDC" ou "Appartement T4 - R+1"
- Si c'est une maison, retournez simplement "Maison"
2. Surface totale en m²
3. Liste des pièces avec leurs surfaces en m²
4. Caractéristiques spéciales du bien :
- IMPORTANT : Les caractéristiques sont listées dans la légende en bas à droite du plan
- Cherchez les symboles et leurs significations : PL (Placard), Etg (Étagère), EV (Évier), Ch (Chaudière gaz)
- Si vous trouvez d'autres symboles dans la légende, ajoutez-les également avec leur signification
- Listez toutes les caractéristiques présentes dans le plan en vous basant sur ces symboles
5. Orientation :
- IMPORTANT : Cherchez la boussole/rose des vents sur le plan. C'est un cercle divisé en quatre parties avec la lettre "N" (Nord)
- Cette boussole se trouve généralement en haut à droite du plan
- La lettre "N" dans la boussole indique la direction du Nord
- Pour déterminer l'orientation du document :
  * Si le "N" de la boussole est à droite du cercle, le document est orienté vers l'OUEST
  * Si le "N" de la boussole est à gauche du cercle, le document est orienté vers l'EST
  * Si le "N" de la boussole est en haut du cercle, le document est orienté vers le NORD
  * Si le "N" de la boussole est en bas du cercle, le document est orienté vers le SUD
- ATTENTION : Ne pas confondre avec d'autres symboles ou flèches sur le plan
- ATTENTION : L'orientation à retourner est celle vers laquelle le document est orienté, PAS la direction du Nord

Retournez les informations au format JSON suivant :
{
    "type_de_bien": "Appartement T3 - RDC/Appartement T4 - 1er étage/Maison",
    "surface_totale": nombre,
    "surface_entree": nombre,
    "surface_sejour": nombre,
    "surface_suite_parentale": nombre,
    "surface_chambre2": nombre,
    "surface_chambre3": nombre,
    "surface_sdb": nombre,
    "surface_wc": nombre,
    "surface_dgt": nombre,
    "surface_terrasse": nombre,
    "caracteristiques": ["Placard dans [pièce]", "Étagère dans [pièce]", "Évier dans [pièce]", "Chaudière gaz dans [pièce]"],
    "vision_analysis": {
        "orientation_document": "Nord/Sud/Est/Ouest"
    }
}

Règles strictes :
1. Utilisez des points (.) et non des virgules (,) pour les nombres décimaux
2. Toutes les surfaces doivent être en m²
3. Capturez toutes les pièces mentionnées dans le plan
4. Ne fusionnez pas les pièces, gardez-les séparées
5. Pour les pièces avec des notes (comme "dont 2.4m² SDE"), incluez la surface totale
6. Pour toute pièce supplémentaire non listée, ajoutez-la avec le préfixe "surface_" suivi du nom en minuscules avec des underscores
7. IMPORTANT : Pour les caractéristiques, précisez la pièce où se trouve chaque équipement (PL, Etg, EV, Ch)"#;

/// System instructions for the text strategy.
///
/// Same key convention as [`VISION_PROMPT`] minus the visual rules: plain
/// text carries neither the compass rose nor the legend symbols' positions,
/// so no `vision_analysis` is requested.
pub const TEXT_SYSTEM_PROMPT: &str = r#"Vous êtes un assistant spécialisé dans l'analyse de plans immobiliers français. On vous fournit le texte brut extrait d'un PDF de plan d'appartement ou de maison. Extrayez les informations suivantes :

1. Type de bien : "Appartement T3 - RDC", "Appartement T4 - R+1", "Maison", etc.
2. Surface totale en m²
3. Liste des pièces avec leurs surfaces en m²
4. Caractéristiques spéciales du bien (placards, étagères, évier, chaudière gaz, ...) avec la pièce concernée

Retournez les informations au format JSON suivant :
{
    "type_de_bien": "Appartement T3 - RDC/Maison",
    "surface_totale": nombre,
    "surface_entree": nombre,
    "surface_sejour": nombre,
    "surface_suite_parentale": nombre,
    "surface_chambre2": nombre,
    "surface_chambre3": nombre,
    "surface_sdb": nombre,
    "surface_wc": nombre,
    "surface_dgt": nombre,
    "surface_terrasse": nombre,
    "caracteristiques": ["Placard dans [pièce]", "Étagère dans [pièce]"]
}

Règles strictes :
1. Utilisez des points (.) et non des virgules (,) pour les nombres décimaux
2. Toutes les surfaces doivent être en m²
3. Ne fusionnez pas les pièces, gardez-les séparées
4. Pour toute pièce supplémentaire non listée, ajoutez-la avec le préfixe "surface_" suivi du nom en minuscules avec des underscores
5. Omettez les clés dont la valeur est inconnue plutôt que d'inventer des surfaces"#;

/// Build the user message carrying the extracted document text.
pub fn text_user_message(document_text: &str) -> String {
    format!(
        "Voici le texte extrait du plan :\n\n\"\"\"\n{}\n\"\"\"",
        document_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CANONICAL_ROOMS;

    #[test]
    fn prompts_cover_every_canonical_key() {
        for (key, _) in CANONICAL_ROOMS {
            assert!(VISION_PROMPT.contains(key), "vision prompt missing {key}");
            assert!(
                TEXT_SYSTEM_PROMPT.contains(key),
                "text prompt missing {key}"
            );
        }
    }

    #[test]
    fn prompts_demand_dot_decimals() {
        assert!(VISION_PROMPT.contains("points (.)"));
        assert!(TEXT_SYSTEM_PROMPT.contains("points (.)"));
    }

    #[test]
    fn only_vision_prompt_requests_orientation() {
        assert!(VISION_PROMPT.contains("orientation_document"));
        assert!(!TEXT_SYSTEM_PROMPT.contains("orientation_document"));
    }

    #[test]
    fn text_user_message_wraps_document() {
        let msg = text_user_message("Séjour 18.5 m²");
        assert!(msg.contains("Séjour 18.5 m²"));
        assert!(msg.starts_with("Voici le texte"));
    }
}
