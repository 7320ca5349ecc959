//! Starter catalog loaded into a fresh store.

use super::{Badge, Product};
use crate::money::{Currency, Money};

/// The launch catalog, grouped by category.
pub fn starter_products(currency: Currency) -> Vec<Product> {
    use Badge::*;

    let rows: [(&str, &str, &str, i64, &str, Option<Badge>); 18] = [
        ("ah-1", "Ácido Hialurônico Juvederm Ultra", "Preenchedor de alta densidade para volumização facial", 89000, "preenchedores", Some(Bestseller)),
        ("ah-2", "Ácido Hialurônico Restylane", "Ideal para contorno labial e sulcos nasogenianos", 75000, "preenchedores", None),
        ("ah-3", "Ácido Hialurônico Belotero", "Textura suave para áreas delicadas", 68000, "preenchedores", Some(New)),
        ("ah-4", "Skinbooster Profhilo", "Bioestimulador e hidratante profundo", 120000, "preenchedores", Some(Bestseller)),
        ("tx-1", "Toxina Botulínica Botox", "100U - Padrão ouro para tratamentos estéticos", 65000, "toxinas", Some(Bestseller)),
        ("tx-2", "Toxina Botulínica Dysport", "500U - Difusão controlada para resultados naturais", 58000, "toxinas", None),
        ("tx-3", "Toxina Botulínica Xeomin", "100U - Sem proteínas complexantes", 62000, "toxinas", Some(Promotion)),
        ("fio-1", "Fios de PDO Lifting", "Pack com 10 fios espiculados 19G", 45000, "fios", None),
        ("fio-2", "Fios de PDO Mono", "Pack com 20 fios lisos para bioestímulo", 28000, "fios", Some(Promotion)),
        ("fio-3", "Fios de PDO Espiral", "Pack com 10 fios para volumização", 35000, "fios", None),
        ("bio-1", "Sculptra (PLLA)", "Bioestimulador de colágeno - 2 frascos", 280000, "bioestimuladores", Some(Bestseller)),
        ("bio-2", "Radiesse (CaHA)", "Preenchedor e bioestimulador 1.5ml", 160000, "bioestimuladores", None),
        ("bio-3", "Ellansé M", "Bioestimulador de longa duração 1ml", 220000, "bioestimuladores", Some(New)),
        ("ac-1", "Cânulas 25G x 50mm", "Caixa com 20 unidades - ponta flexível", 12000, "insumos", None),
        ("ac-2", "Cânulas 27G x 40mm", "Caixa com 20 unidades - ultra finas", 13000, "insumos", None),
        ("ac-3", "Agulhas 30G x 13mm", "Caixa com 100 unidades", 4500, "insumos", None),
        ("ac-4", "Anestésico Lidocaína 2%", "Frasco 20ml com vasoconstritor", 3500, "insumos", None),
        ("ac-5", "Pomada Anestésica EMLA", "Bisnaga 30g - Lidocaína + Prilocaína", 8500, "insumos", None),
    ];

    rows.into_iter()
        .map(|(id, name, description, cents, category, badge)| {
            let mut product = Product::new(id, name, Money::new(cents, currency), category)
                .with_description(description);
            product.badge = badge;
            product
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_categories;

    #[test]
    fn test_starter_products_use_default_categories() {
        let slugs: Vec<String> = default_categories().into_iter().map(|c| c.slug).collect();
        let products = starter_products(Currency::BRL);
        assert_eq!(products.len(), 18);
        assert!(products.iter().all(|p| slugs.contains(&p.category)));
    }

    #[test]
    fn test_starter_prices() {
        let products = starter_products(Currency::BRL);
        assert_eq!(products[0].price.display(), "R$ 890,00");
        assert_eq!(products[10].price.display(), "R$ 2.800,00");
    }
}
