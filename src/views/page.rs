//! Document shell around the rendered panels

use crate::catalog::FilterState;

use super::{escape, Direction, Screen};

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 1100px; margin: 0 auto; padding: 24px; }
.filter-wrapper { display: flex; gap: 18px; align-items: center; }
.product-search-input { flex: 1; padding: 12px; font-size: 16px; }
#productsContainer { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 16px; margin: 24px 0; }
.product-card { position: relative; border: 1px solid #ccc; border-radius: 8px; padding: 10px; }
.product-card.selected { border: 2px solid #007bff; background: #eaf4ff; }
.product-card.expanded { box-shadow: 0 4px 16px rgba(0,0,0,0.08); }
.product-card form { margin: 0; }
.card-body { display: block; width: 100%; background: none; border: none; text-align: inherit; cursor: pointer; }
.card-body img { width: 90px; height: 90px; object-fit: contain; }
.dropdown-btn { position: absolute; top: 10px; right: 10px; background: transparent; border: none; cursor: pointer; color: #007bff; }
.product-card.expanded .dropdown-icon { display: inline-block; transform: rotate(180deg); }
.selected-product-item { display: flex; align-items: center; gap: 8px; background: #f6f6f6; border-radius: 6px; padding: 4px 8px; margin: 4px 0; }
.selected-product-item img { width: 40px; height: 40px; object-fit: contain; }
.selected-product-item form { margin: 0; }
.remove-btn { background: none; border: none; color: #c00; font-size: 20px; cursor: pointer; }
#clearSelectedProducts { margin-top: 16px; padding: 8px 18px; color: #c00; background: #fff; border: 1.5px solid #c00; border-radius: 6px; font-weight: bold; }
#chatWindow { display: flex; flex-direction: column; min-height: 120px; }
.chat-bubble { max-width: 80%; margin: 16px 0; padding: 16px 18px; border-radius: 18px; line-height: 1.6; word-break: break-word; white-space: pre-wrap; }
.user-bubble { background: #fff; color: #111; border: 1.5px solid #000; margin-left: auto; }
.ai-bubble { background: #111; color: #fff; margin-right: auto; }
.placeholder-message { color: #666; text-align: center; padding: 24px; }
body.rtl-mode .dropdown-btn { right: auto; left: 10px; }
body.rtl-mode .user-bubble { margin-left: 0; margin-right: auto; }
body.rtl-mode .ai-bubble { margin-right: 0; margin-left: auto; }
"#;

/// Poll interval while a relay call is in flight
const PENDING_REFRESH_SECS: u32 = 2;

pub struct PageContext<'a> {
    pub screen: &'a Screen,
    pub filter: &'a FilterState,
    pub categories: &'a [String],
    pub direction: Direction,
}

pub fn render(ctx: &PageContext<'_>) -> String {
    let dir = ctx.direction.as_str();
    let body_class = match ctx.direction {
        Direction::Rtl => " class=\"rtl-mode\"",
        Direction::Ltr => "",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en" dir="{dir}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Routine Builder</title>
{refresh}<style>{STYLE}</style>
</head>
<body dir="{dir}"{body_class}>
<header><h1>Smart Routine &amp; Product Advisor</h1></header>
<section class="search-section">
  <form method="post" action="/filter" class="filter-wrapper">
    <select id="categoryFilter" name="category">
{options}    </select>
    <input type="text" id="productSearch" name="search" class="product-search-input" placeholder="Search products by name or keyword..." value="{search}">
    <button type="submit">Filter</button>
  </form>
</section>
<section id="productsContainer" class="products-grid">
{catalog}</section>
<section class="selected-products">
  <h2>Selected Products</h2>
{selection}  <form method="post" action="/routine">
    <button type="submit" id="generateRoutine" class="generate-btn">Generate Routine</button>
  </form>
</section>
<section class="chatbox">
  <h2>Let's Build Your Routine</h2>
  <div id="chatWindow" class="chat-window" aria-live="polite">
{chat}  </div>
  <form method="post" action="/chat" id="chatForm" class="chat-form">
    <label for="userInput" class="visually-hidden">Message</label>
    <input type="text" id="userInput" name="message" placeholder="Ask me about products or routines..." autocomplete="off">
    <button type="submit" id="sendBtn">Send</button>
  </form>
</section>
</body>
</html>
"#,
        refresh = if ctx.screen.pending {
            format!("<meta http-equiv=\"refresh\" content=\"{}\">\n", PENDING_REFRESH_SECS)
        } else {
            String::new()
        },
        options = category_options(ctx.categories, ctx.filter.category.as_deref()),
        search = escape(&ctx.filter.search),
        catalog = ctx.screen.catalog,
        selection = ctx.screen.selection,
        chat = ctx.screen.chat,
    )
}

fn category_options(categories: &[String], current: Option<&str>) -> String {
    let mut options = format!(
        "      <option value=\"\"{}>All Categories</option>\n",
        if current.is_none() { " selected" } else { "" }
    );

    for category in categories {
        let selected = if current == Some(category.as_str()) { " selected" } else { "" };
        options.push_str(&format!(
            "      <option value=\"{value}\"{selected}>{label}</option>\n",
            value = escape(category),
            label = escape(&title_case(category)),
        ));
    }

    options
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
