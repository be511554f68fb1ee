use maud::{DOCTYPE, Markup, html};

use crate::registry::MenuItem;

/// Wraps a page body in the application frame with the navigation menu.
pub fn document(title: &str, menu: &[MenuItem], active: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="he" dir="rtl" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                link rel="stylesheet" href="/assets/style.css";
                title { (title) " - Open Bus" }
            }

            body {
                (nav(menu, active))
                main { (body) }
            }
        }
    }
}

fn nav(menu: &[MenuItem], active: &str) -> Markup {
    html! {
        nav class="menu" {
            a class="brand" href="/dashboard" { "Open Bus" }
            ul {
                @for item in menu {
                    li { (menu_item(item, active)) }
                }
            }
        }
    }
}

fn menu_item(item: &MenuItem, active: &str) -> Markup {
    let path = item.href.split('?').next().unwrap_or_default();
    let class = if !item.external && path.eq_ignore_ascii_case(active) {
        "menu-item active"
    } else {
        "menu-item"
    };
    let (target, rel) = if item.external {
        (Some("_blank"), Some("noopener noreferrer"))
    } else {
        (None, None)
    };

    html! {
        a class=(class) href=(item.href) target=[target] rel=[rel] {
            span class={ "icon icon-" (item.icon.name()) } {}
            (item.label)
        }
    }
}
