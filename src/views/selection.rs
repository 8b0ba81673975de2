//! Selected products panel

use crate::catalog::Product;
use crate::selection::SelectionStore;

use super::{escape, path_segment, placeholder};

/// Render every selected product found in the full `catalog`
///
/// The bulk-clear control is emitted exactly once when at least one row is
/// shown and omitted otherwise.
pub fn render(catalog: &[Product], selection: &SelectionStore) -> String {
    let selected = selection.resolve(catalog);

    if selected.is_empty() {
        return format!(
            "<div id=\"selectedProductsList\">{}</div>\n",
            placeholder("No products selected yet.")
        );
    }

    let rows: String = selected.iter().map(|product| row(product)).collect();

    format!(
        r#"<div id="selectedProductsList">
{rows}</div>
<form method="post" action="/selection/clear" class="clear-form">
  <button type="submit" id="clearSelectedProducts">Clear All</button>
</form>
"#
    )
}

fn row(product: &Product) -> String {
    let name = escape(&product.name);
    format!(
        r#"<div class="selected-product-item" data-id="{id}">
  <img src="{image}" alt="{name}" title="{name}">
  <span>{name}</span>
  <form method="post" action="/selection/{segment}/remove">
    <button type="submit" class="remove-btn" title="Remove" aria-label="Remove {name}">&times;</button>
  </form>
</div>
"#,
        id = escape(&product.id.to_string()),
        image = escape(&product.image),
        segment = path_segment(&product.id),
    )
}
