//! # Console Front End
//!
//! Line-oriented register over stdin/stdout. Each line is one command; a
//! refused command prints a notice and the register carries on.
//!
//! ```text
//! > open
//! Register open · Turno #9f2c · sales S/ 0.00
//! > scan 7750182000123
//! + Inca Kola 500ml
//!   p1          Inca Kola 500ml               x1     S/ 2.50
//!   ──────────────────────────────────────────────────────────
//!   Total (1 units)                                  S/ 2.50
//! > scan 0000
//! ! Product not found for barcode: 0000
//! ```

use std::time::Duration;

use caja_core::catalog::StockLevel;
use caja_core::{CashIntent, Discount, LineKey, Money, VariantPicker};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use crate::collab::cash::CashDrawer;
use crate::collab::checkout::CheckoutService;
use crate::commands::cart::{self, CartResponse, SelectResponse};
use crate::commands::catalog::{self, ProductTile};
use crate::commands::scan::{self, ScanResponse};
use crate::commands::shift::{self, ShiftResponse};
use crate::commands::checkout;
use crate::error::{ApiError, AppError};
use crate::state::{ConfigState, SessionState};

const HELP: &str = "\
commands:
  products [search]         list products (current category)
  categories                list categories
  category <name>|all       filter the product list
  select <product>          add a product or open its variant choice
  variant <variant>         pick a variant
  dismiss                   close the variant choice
  scan <barcode>            scan a barcode
  qty <line> <n>            set quantity (line = product or product/variant)
  remove <line>             remove a line
  discount <line> <amt|n%>  discount a line
  undiscount <line>         remove a line discount
  clear                     empty the cart
  cart                      show the cart
  shift                     show the shift badge
  open                      open the register
  in <amount>               cash into the drawer
  close                     close the register
  checkout                  charge the cart
  fail-next                 make the next checkout fail
  quit";

/// What a command line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Console {
    config: ConfigState,
    session: SessionState,
    drawer: CashDrawer,
    checkout: CheckoutService,
    category: Option<String>,
}

impl Console {
    pub fn new(config: ConfigState, session: SessionState) -> Self {
        let drawer = CashDrawer::new(config.opening_float);
        let checkout = CheckoutService::new(Duration::from_millis(config.checkout_latency_ms));
        Console {
            config,
            session,
            drawer,
            checkout,
            category: None,
        }
    }

    pub async fn run(mut self) -> Result<(), AppError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        let banner = format!(
            "{}\n{}\ntype 'help' for commands\n> ",
            self.config.store_name,
            self.render_shift(&shift::get_shift(&self.session))
        );
        stdout.write_all(banner.as_bytes()).await?;
        stdout.flush().await?;

        while let Some(line) = lines.next_line().await? {
            let output = match self.execute(&line).await {
                Ok(Reply::Quit) => break,
                Ok(Reply::Text(text)) => text,
                Err(err) => {
                    warn!(code = ?err.code, "{}", err.message);
                    format!("! {}", err.message)
                }
            };
            if !output.is_empty() {
                stdout.write_all(output.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
        }

        Ok(())
    }

    pub async fn execute(&mut self, line: &str) -> Result<Reply, ApiError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Reply::Text(String::new()));
        };
        let args: Vec<&str> = words.collect();

        let text = match (command, args.as_slice()) {
            ("help", _) => HELP.to_string(),
            ("quit" | "exit", _) => return Ok(Reply::Quit),

            ("products", search) => {
                let tiles = catalog::list_products(
                    &self.session,
                    &search.join(" "),
                    self.category.as_deref(),
                )?;
                self.render_tiles(&tiles)
            }
            ("categories", []) => catalog::list_categories(&self.session)?.join("  "),
            ("category", ["all"]) => {
                self.category = None;
                "showing all categories".to_string()
            }
            ("category", name) if !name.is_empty() => {
                let name = name.join(" ");
                let text = format!("showing {}", name);
                self.category = Some(name);
                text
            }

            ("select", [product_id]) => {
                let response = cart::select_product(&self.session, product_id)?;
                self.render_selection(&response)
            }
            ("variant", [variant_id]) => {
                let response = cart::choose_variant(&self.session, variant_id)?;
                self.render_cart(&response)
            }
            ("dismiss", []) => {
                let response = cart::dismiss_variant_choice(&self.session)?;
                self.render_cart(&response)
            }
            ("scan", [code]) => match scan::scan_barcode(&self.session, code)? {
                ScanResponse::Resolved { selection } => self.render_selection(&selection),
                ScanResponse::Empty | ScanResponse::Pending { .. } => String::new(),
            },

            ("qty", [line, quantity]) => {
                let quantity = quantity
                    .parse::<i64>()
                    .map_err(|_| ApiError::bad_request(format!("not a quantity: {}", quantity)))?;
                let response = cart::update_cart_item(&self.session, &parse_line(line), quantity)?;
                self.render_cart(&response)
            }
            ("remove", [line]) => {
                let response = cart::remove_from_cart(&self.session, &parse_line(line))?;
                self.render_cart(&response)
            }
            ("discount", [line, value]) => {
                let discount = self.parse_discount(value)?;
                let response = cart::apply_discount(&self.session, &parse_line(line), discount)?;
                self.render_cart(&response)
            }
            ("undiscount", [line]) => {
                let response = cart::clear_discount(&self.session, &parse_line(line))?;
                self.render_cart(&response)
            }
            ("clear", []) => {
                let response = cart::clear_cart(&self.session)?;
                self.render_cart(&response)
            }
            ("cart", []) => self.render_cart(&cart::get_cart(&self.session)),

            ("shift", []) => self.render_shift(&shift::get_shift(&self.session)),
            ("open", []) => {
                let response = shift::open_shift(&self.session, &mut self.drawer)?;
                self.render_shift(&response)
            }
            ("in", [amount]) => {
                let amount = self
                    .config
                    .parse_amount(amount)
                    .ok_or_else(|| ApiError::bad_request(format!("not an amount: {}", amount)))?;
                shift::cash_in(&self.session, &mut self.drawer, amount)?;
                format!(
                    "cash in {} · drawer {}",
                    self.config.format_currency(amount),
                    self.config.format_currency(self.drawer.expected_cash())
                )
            }
            ("close", []) => {
                let response = shift::close_shift(&self.session, &mut self.drawer)?;
                self.render_shift(&response)
            }

            ("checkout", []) => {
                let transaction = checkout::checkout(&self.session, &self.checkout).await?;
                format!(
                    "sale {} · {} units · {}",
                    transaction.id,
                    transaction.item_count,
                    self.config.format_currency(transaction.total)
                )
            }
            ("fail-next", []) => {
                self.checkout.fail_next();
                "next checkout will fail".to_string()
            }

            _ => return Err(ApiError::bad_request(format!("unknown command: {}", line.trim()))),
        };

        Ok(Reply::Text(text))
    }

    fn parse_discount(&self, value: &str) -> Result<Discount, ApiError> {
        let invalid = || ApiError::bad_request(format!("not a discount: {}", value));
        match value.strip_suffix('%') {
            Some(percent) => parse_percent_bps(percent)
                .map(|bps| Discount::Percentage { bps })
                .ok_or_else(invalid),
            None => self
                .config
                .parse_amount(value)
                .map(|amount| Discount::Amount { amount })
                .ok_or_else(invalid),
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    fn render_tiles(&self, tiles: &[ProductTile]) -> String {
        if tiles.is_empty() {
            return "no products".to_string();
        }
        tiles
            .iter()
            .map(|tile| {
                let stock = match tile.stock {
                    StockLevel::OutOfStock => "sold out".to_string(),
                    StockLevel::Low(units) => format!("only {} left", units),
                    StockLevel::InStock(units) => format!("{} in stock", units),
                    StockLevel::Variants => "variants".to_string(),
                };
                let in_cart = if tile.in_cart > 0 {
                    format!("  [{} in cart]", tile.in_cart)
                } else {
                    String::new()
                };
                format!(
                    "  {:<6} {:<28} {:>12}  {}{}",
                    tile.id,
                    tile.name,
                    self.config.format_currency(tile.price),
                    stock,
                    in_cart
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_selection(&self, response: &SelectResponse) -> String {
        match response {
            SelectResponse::Added { line, cart } => {
                let name = cart
                    .items
                    .iter()
                    .find(|item| &item.key() == line)
                    .map(|item| item.name.as_str())
                    .unwrap_or_default();
                format!("+ {}\n{}", name, self.render_cart(cart))
            }
            SelectResponse::ChooseVariant { picker } => self.render_picker(picker),
        }
    }

    fn render_picker(&self, picker: &VariantPicker) -> String {
        if picker.is_empty() {
            return format!(
                "{}: no variants configured (dismiss to continue)",
                picker.product_name
            );
        }
        let mut out = format!("choose a variant of {}:", picker.product_name);
        for option in picker.options() {
            out.push_str(&format!(
                "\n  {:<6} {:<12} {:>12}  {}{}",
                option.variant.id,
                option.variant.name,
                self.config.format_currency(option.variant.price),
                if option.selectable {
                    format!("{} in stock", option.variant.stock)
                } else {
                    "sold out".to_string()
                },
                if option.in_cart > 0 {
                    format!("  [{} in cart]", option.in_cart)
                } else {
                    String::new()
                }
            ));
        }
        out
    }

    fn render_cart(&self, cart: &CartResponse) -> String {
        if cart.items.is_empty() {
            return "  cart is empty".to_string();
        }
        let mut out = String::new();
        for item in &cart.items {
            out.push_str(&format!(
                "  {:<11} {:<28} x{:<4} {:>12}\n",
                item.key().to_string(),
                item.name,
                item.quantity,
                self.config.format_currency(item.line_total())
            ));
            if item.discount.is_some() {
                out.push_str(&format!(
                    "  {:<11} {:<34} {:>12}\n",
                    "",
                    "discount",
                    self.config.format_currency(Money::zero() - item.discount_amount())
                ));
            }
        }
        out.push_str(&format!("  {}\n", "─".repeat(58)));
        if !cart.totals.discount.is_zero() {
            out.push_str(&format!(
                "  {:<46}{:>12}\n",
                "Subtotal",
                self.config.format_currency(cart.totals.subtotal)
            ));
        }
        out.push_str(&format!(
            "  {:<46}{:>12}",
            format!("Total ({} units)", cart.totals.total_quantity),
            self.config.format_currency(cart.totals.total)
        ));
        out
    }

    fn render_shift(&self, shift: &ShiftResponse) -> String {
        match &shift.label {
            Some(label) => format!(
                "Register open · Turno #{} · sales {}",
                label,
                self.config.format_currency(shift.sales_so_far)
            ),
            None => {
                let hint = if shift.affordances.contains(&CashIntent::Open) {
                    " (type 'open')"
                } else {
                    ""
                };
                format!("Register closed{}", hint)
            }
        }
    }
}

/// "p1" or "p1/v2".
fn parse_line(text: &str) -> LineKey {
    match text.split_once('/') {
        Some((product, variant)) => LineKey::variant(product, variant),
        None => LineKey::product(text),
    }
}

/// "10" → 1000 bps, "12.5" → 1250 bps.
fn parse_percent_bps(text: &str) -> Option<u32> {
    let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() || frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: u32 = whole.parse().ok()?;
    let frac: u32 = if frac.is_empty() {
        0
    } else {
        format!("{:0<2}", frac).parse().ok()?
    };
    whole.checked_mul(100)?.checked_add(frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::catalog::demo_catalog;

    fn console() -> Console {
        let config = ConfigState {
            checkout_latency_ms: 0,
            ..ConfigState::default()
        };
        Console::new(config, SessionState::new(demo_catalog(), None))
    }

    async fn text(console: &mut Console, line: &str) -> String {
        match console.execute(line).await {
            Ok(Reply::Text(text)) => text,
            other => panic!("{:?} for {:?}", other, line),
        }
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("p1"), LineKey::product("p1"));
        assert_eq!(parse_line("p5/v2"), LineKey::variant("p5", "v2"));
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent_bps("10"), Some(1000));
        assert_eq!(parse_percent_bps("12.5"), Some(1250));
        assert_eq!(parse_percent_bps("0.25"), Some(25));
        assert_eq!(parse_percent_bps("1.234"), None);
        assert_eq!(parse_percent_bps("x"), None);
    }

    #[tokio::test]
    async fn test_sales_need_an_open_register() {
        let mut console = console();
        let err = console.execute("select p1").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ShiftClosed);

        assert!(text(&mut console, "open").await.starts_with("Register open · Turno #"));
        assert!(text(&mut console, "select p1").await.starts_with("+ Inca Kola 500ml"));
    }

    #[tokio::test]
    async fn test_full_sale() {
        let mut console = console();
        text(&mut console, "open").await;
        text(&mut console, "scan 7750182000123").await;
        text(&mut console, "scan 7750182000123").await;
        text(&mut console, "select p5").await;
        text(&mut console, "variant v2").await;
        text(&mut console, "discount p5/v2 10%").await;

        let cart = text(&mut console, "cart").await;
        assert!(cart.contains("Polo Básico (M)"));
        assert!(cart.contains("Total (3 units)"));
        assert!(cart.contains("S/ 36.50"));

        let sale = text(&mut console, "checkout").await;
        assert!(sale.ends_with("3 units · S/ 36.50"));
        assert_eq!(text(&mut console, "cart").await, "  cart is empty");
        assert!(text(&mut console, "shift").await.ends_with("sales S/ 36.50"));
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let mut console = console();
        text(&mut console, "open").await;
        text(&mut console, "select p4").await;
        text(&mut console, "fail-next").await;

        let err = console.execute("checkout").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::CheckoutFailed);
        assert!(text(&mut console, "cart").await.contains("Papas Lays"));
    }

    #[tokio::test]
    async fn test_bad_input() {
        let mut console = console();
        assert_eq!(text(&mut console, "   ").await, "");
        assert!(console.execute("frobnicate").await.is_err());
        assert!(console.execute("qty p1 many").await.is_err());
        assert!(console.execute("in lots").await.is_err());
        assert_eq!(console.execute("quit").await.unwrap(), Reply::Quit);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let mut console = console();
        let err = console.execute("products").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ShiftClosed);

        text(&mut console, "open").await;
        text(&mut console, "category Snacks").await;
        let products = text(&mut console, "products").await;
        assert!(products.contains("Galletas Casino"));
        assert!(products.contains("sold out"));
        assert!(!products.contains("Inca Kola"));

        text(&mut console, "category all").await;
        assert!(text(&mut console, "products kola").await.contains("Inca Kola"));
    }

    #[tokio::test]
    async fn test_cash_in() {
        let mut console = console();
        text(&mut console, "open").await;
        assert_eq!(
            text(&mut console, "in 20").await,
            "cash in S/ 20.00 · drawer S/ 120.00"
        );
    }
}
