//! Product grid

use std::collections::HashSet;

use crate::catalog::{Product, ProductId};
use crate::selection::SelectionStore;

use super::{escape, path_segment, placeholder};

/// One card per product, in the given order
///
/// The description toggle and the card body post to different actions, so
/// expanding a card never changes the selection.
pub fn render(products: &[Product], selection: &SelectionStore, expanded: &HashSet<ProductId>) -> String {
    if products.is_empty() {
        return placeholder("No products match your filters.");
    }

    products
        .iter()
        .map(|product| card(product, selection.contains(&product.id), expanded.contains(&product.id)))
        .collect()
}

pub fn render_unavailable() -> String {
    placeholder("Unable to load products. Please try again later.")
}

fn card(product: &Product, selected: bool, expanded: bool) -> String {
    let segment = path_segment(&product.id);
    let id = escape(&product.id.to_string());
    let name = escape(&product.name);

    let mut class = String::from("product-card");
    if selected {
        class.push_str(" selected");
    }
    if expanded {
        class.push_str(" expanded");
    }

    format!(
        r#"<article class="{class}" data-id="{id}">
  <form method="post" action="/products/{segment}/details" class="details-form">
    <button type="submit" class="dropdown-btn" aria-label="{label} description" aria-expanded="{expanded}"><span class="dropdown-icon">&#9660;</span></button>
  </form>
  <form method="post" action="/products/{segment}/select" class="select-form">
    <button type="submit" class="card-body" aria-pressed="{selected}">
      <img src="{image}" alt="{name}">
      <div class="product-info">
        <h3>{name}</h3>
        <p>{brand}</p>
        <div class="product-desc"{hidden}>{description}</div>
      </div>
    </button>
  </form>
</article>
"#,
        label = if expanded { "Hide" } else { "Show" },
        image = escape(&product.image),
        brand = escape(&product.brand),
        hidden = if expanded { "" } else { " hidden" },
        description = escape(product.description.as_deref().unwrap_or_default()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{MemoryStore, SELECTION_KEY};
    use std::sync::Arc;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: ProductId::Number(id),
            name: name.to_string(),
            brand: "Garnier".to_string(),
            category: "haircare".to_string(),
            image: format!("https://img.example/{}.png", id),
            description: Some(format!("About {}", name)),
        }
    }

    fn selection(ids: &[i64]) -> SelectionStore {
        let mut store = SelectionStore::restore(Arc::new(MemoryStore::new()), SELECTION_KEY);
        for id in ids {
            store.toggle(ProductId::Number(*id));
        }
        store
    }

    #[test]
    fn test_cards_in_source_order() {
        let products = vec![product(2, "Shampoo"), product(1, "Hair Oil")];
        let html = render(&products, &selection(&[]), &HashSet::new());

        assert_eq!(html.matches("<article").count(), 2);
        let shampoo = html.find("Shampoo").unwrap();
        let oil = html.find("Hair Oil").unwrap();
        assert!(shampoo < oil);
    }

    #[test]
    fn test_selected_and_expanded_states() {
        let products = vec![product(1, "Hair Oil"), product(2, "Shampoo")];
        let expanded: HashSet<_> = [ProductId::Number(2)].into_iter().collect();
        let html = render(&products, &selection(&[1]), &expanded);

        assert!(html.contains(r#"<article class="product-card selected" data-id="1">"#));
        assert!(html.contains(r#"<article class="product-card expanded" data-id="2">"#));
        assert!(html.contains(r#"<div class="product-desc" hidden>About Hair Oil</div>"#));
        assert!(html.contains(r#"<div class="product-desc">About Shampoo</div>"#));
        assert!(html.contains(r#"aria-label="Hide description""#));
    }

    #[test]
    fn test_separate_actions_for_details_and_selection() {
        let html = render(&[product(7, "Serum")], &selection(&[]), &HashSet::new());
        assert!(html.contains(r#"action="/products/7/details""#));
        assert!(html.contains(r#"action="/products/7/select""#));
    }

    #[test]
    fn test_empty_subset_placeholder() {
        let html = render(&[], &selection(&[]), &HashSet::new());
        assert!(html.contains("placeholder-message"));
        assert!(!html.contains("<article"));
    }
}
