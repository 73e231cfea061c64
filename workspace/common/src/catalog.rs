//! Static reference tables: products, counties, markets and default prices.
//!
//! The tables are compiled in and never change at runtime. Lookups that feed
//! the display fall back to the raw identifier so an unknown id still renders.

use serde::Serialize;

/// A commodity the prediction service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    /// Whether the product is offered in the form selector.
    pub offered: bool,
}

/// A wholesale market inside a county.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Market {
    pub id: &'static str,
    pub name: &'static str,
}

/// A county and the markets that belong to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct County {
    pub id: &'static str,
    pub name: &'static str,
    /// Whether the county is offered in the form selector.
    pub offered: bool,
    pub markets: &'static [Market],
}

/// Recent price history used when the user does not supply their own (KES/Kg).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DefaultPrices {
    /// Most recent monthly price
    pub wholesale_price_lag1: f64,
    /// Price of the month before
    pub wholesale_price_lag2: f64,
    /// Three month rolling average
    pub wholesale_price_rolling_avg: f64,
}

impl DefaultPrices {
    pub const fn new(lag1: f64, lag2: f64, rolling_avg: f64) -> Self {
        Self {
            wholesale_price_lag1: lag1,
            wholesale_price_lag2: lag2,
            wholesale_price_rolling_avg: rolling_avg,
        }
    }
}

/// Immutable set of reference tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catalog {
    pub products: &'static [Product],
    pub counties: &'static [County],
    pub default_prices: &'static [(&'static str, DefaultPrices)],
    /// Used for any product without its own entry in `default_prices`.
    pub fallback_prices: DefaultPrices,
}

impl Catalog {
    /// Products shown in the product selector.
    pub fn offered_products(&self) -> impl Iterator<Item = &'static Product> {
        self.products.iter().filter(|p| p.offered)
    }

    /// Counties shown in the county selector.
    pub fn offered_counties(&self) -> impl Iterator<Item = &'static County> {
        self.counties.iter().filter(|c| c.offered)
    }

    pub fn product(&self, id: &str) -> Option<&'static Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn county(&self, id: &str) -> Option<&'static County> {
        self.counties.iter().find(|c| c.id == id)
    }

    pub fn market(&self, id: &str) -> Option<&'static Market> {
        self.all_markets().find(|m| m.id == id)
    }

    /// Every market of every county, in table order.
    pub fn all_markets(&self) -> impl Iterator<Item = &'static Market> {
        self.counties.iter().flat_map(|c| c.markets.iter())
    }

    /// Markets of a county; empty for an unknown county.
    pub fn markets_in(&self, county_id: &str) -> &'static [Market] {
        self.county(county_id).map(|c| c.markets).unwrap_or(&[])
    }

    pub fn county_has_market(&self, county_id: &str, market_id: &str) -> bool {
        self.markets_in(county_id).iter().any(|m| m.id == market_id)
    }

    /// Display name of a product, or the id itself when unmapped.
    pub fn product_name<'a>(&self, id: &'a str) -> &'a str {
        self.product(id).map(|p| p.name).unwrap_or(id)
    }

    /// Display name of a market, or the id itself when unmapped.
    pub fn market_name<'a>(&self, id: &'a str) -> &'a str {
        self.market(id).map(|m| m.name).unwrap_or(id)
    }

    /// Default price triple of a product, falling back to the generic triple.
    pub fn default_prices_for(&self, product_id: &str) -> DefaultPrices {
        self.default_prices
            .iter()
            .find(|(id, _)| *id == product_id)
            .map(|(_, prices)| *prices)
            .unwrap_or(self.fallback_prices)
    }
}

const BUNGOMA_MARKETS: &[Market] = &[
    Market { id: "bungoma-town", name: "Bungoma Town" },
    Market { id: "kimilili", name: "Kimilili" },
    Market { id: "webuye", name: "Webuye" },
    Market { id: "chwele", name: "Chwele" },
    Market { id: "kanduyi", name: "Kanduyi" },
];

const KISUMU_MARKETS: &[Market] = &[
    Market { id: "kisumu-city", name: "Kisumu City" },
    Market { id: "ahero", name: "Ahero" },
    Market { id: "muhoroni", name: "Muhoroni" },
    Market { id: "kondele", name: "Kondele" },
    Market { id: "kibuye", name: "Kibuye" },
];

const KAKAMEGA_MARKETS: &[Market] = &[
    Market { id: "kakamega-town", name: "Kakamega Town" },
    Market { id: "mumias", name: "Mumias" },
    Market { id: "butere", name: "Butere" },
    Market { id: "malava", name: "Malava" },
    Market { id: "lurambi", name: "Lurambi" },
];

const KIAMBU_MARKETS: &[Market] = &[
    Market { id: "kiambu-town", name: "Kiambu Town" },
    Market { id: "thika", name: "Thika" },
    Market { id: "kikuyu", name: "Kikuyu" },
    Market { id: "limuru", name: "Limuru" },
    Market { id: "ruiru", name: "Ruiru" },
];

const BUSIA_MARKETS: &[Market] = &[
    Market { id: "busia-town", name: "Busia Town" },
    Market { id: "malaba", name: "Malaba" },
    Market { id: "port-victoria", name: "Port Victoria" },
    Market { id: "bumala", name: "Bumala" },
    Market { id: "nambale", name: "Nambale" },
];

/// The reference tables the application ships with.
pub static BUILTIN_CATALOG: Catalog = Catalog {
    products: &[
        Product { id: "groundnuts", name: "Groundnuts Red", offered: true },
        Product { id: "green-grams", name: "Green Grams", offered: true },
        Product { id: "rosecoco-beans", name: "Rosecoco Beans", offered: false },
        Product { id: "pishori-rice", name: "Rice", offered: false },
        Product { id: "sorghum", name: "Sorghum", offered: false },
        Product { id: "millet", name: "Millet", offered: false },
    ],
    counties: &[
        County { id: "bungoma", name: "Bungoma", offered: true, markets: BUNGOMA_MARKETS },
        County { id: "kisumu", name: "Kisumu", offered: false, markets: KISUMU_MARKETS },
        County { id: "kakamega", name: "Kakamega", offered: false, markets: KAKAMEGA_MARKETS },
        County { id: "kiambu", name: "Kiambu", offered: false, markets: KIAMBU_MARKETS },
        County { id: "busia", name: "Busia", offered: false, markets: BUSIA_MARKETS },
    ],
    default_prices: &[
        ("groundnuts", DefaultPrices::new(250.0, 220.0, 243.0)),
        ("green-grams", DefaultPrices::new(125.0, 125.0, 125.0)),
    ],
    fallback_prices: DefaultPrices::new(100.0, 95.0, 97.5),
};
