//! Customer cart, kept on the customer's device until checkout.

use crate::model::{ItemDraft, Money, ProductSnapshot};
use std::collections::BTreeSet;

/// One cart line, priced at the catalog price shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_ref: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub comment: Option<String>,
    pub excluded_ingredients: BTreeSet<String>,
}

impl CartLine {
    pub fn new(product: &ProductSnapshot, quantity: u32) -> Self {
        Self {
            product_ref: product.product_ref().to_string(),
            name: product.name().to_string(),
            unit_price: product.unit_price(),
            quantity,
            comment: None,
            excluded_ingredients: BTreeSet::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = (!comment.trim().is_empty()).then_some(comment);
        self
    }

    pub fn without(mut self, ingredient: impl Into<String>) -> Self {
        self.excluded_ingredients.insert(ingredient.into());
        self
    }

    fn merges_with(&self, other: &CartLine) -> bool {
        self.comment.is_none()
            && other.comment.is_none()
            && self.product_ref == other.product_ref
            && self.excluded_ingredients == other.excluded_ingredients
    }

    pub fn line_total(&self) -> Money {
        self.unit_price * Money::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds a line. A plain line (no comment) of a product already in the cart
    /// with the same exclusions bumps that line's quantity; a commented line is
    /// always kept on its own. Zero quantities are ignored.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|existing| existing.merges_with(&line)) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Sets the quantity of line `index`; zero or less removes the line and
    /// anything above `u32::MAX` is capped there.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) {
        if index >= self.lines.len() {
            return;
        }
        if quantity <= 0 {
            self.lines.remove(index);
            return;
        }
        self.lines[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    }

    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Lines as order drafts. Prices are not sent; the order snapshots the
    /// catalog at submission.
    pub fn to_drafts(&self) -> Vec<ItemDraft> {
        self.lines
            .iter()
            .map(|line| ItemDraft {
                product_ref: line.product_ref.clone(),
                quantity: line.quantity,
                excluded_ingredients: line.excluded_ingredients.clone(),
                comment: line.comment.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taco() -> ProductSnapshot {
        ProductSnapshot::capture("taco", "Taco", 8000, 3000)
    }

    #[test]
    fn test_plain_lines_merge() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(&taco(), 1));
        cart.add(CartLine::new(&taco(), 2));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.total(), 24000);
    }

    #[test]
    fn test_commented_or_modified_lines_stay_separate() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(&taco(), 1));
        cart.add(CartLine::new(&taco(), 1).with_comment("extra salsa"));
        cart.add(CartLine::new(&taco(), 1).with_comment("extra salsa"));
        cart.add(CartLine::new(&taco(), 1).without("onion"));
        assert_eq!(cart.lines().len(), 4);
    }

    #[test]
    fn test_non_positive_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(&taco(), 2));
        cart.set_quantity(0, 5);
        assert_eq!(cart.lines()[0].quantity, 5);
        cart.set_quantity(0, -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_oversized_quantities_are_capped() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(&taco(), 2));
        cart.set_quantity(0, i64::from(u32::MAX) + 1);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, u32::MAX);

        cart.add(CartLine::new(&taco(), 3));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_drafts_carry_comments() {
        let mut cart = Cart::new();
        cart.add(CartLine::new(&taco(), 2).with_comment("no spice"));
        let drafts = cart.to_drafts();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].quantity, 2);
        assert_eq!(drafts[0].comment.as_deref(), Some("no spice"));
    }
}
