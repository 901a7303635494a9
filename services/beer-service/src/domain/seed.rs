//! 示例数据

use rust_decimal::Decimal;

use crate::domain::{BeerDraft, BeerStyle, CustomerDraft};

pub fn sample_beers() -> Vec<BeerDraft> {
    vec![
        BeerDraft {
            beer_name: "Galaxy Cat".to_string(),
            beer_style: BeerStyle::PaleAle,
            upc: "12356".to_string(),
            quantity_on_hand: Some(122),
            price: Decimal::new(1299, 2),
        },
        BeerDraft {
            beer_name: "Crank".to_string(),
            beer_style: BeerStyle::PaleAle,
            upc: "12356222".to_string(),
            quantity_on_hand: Some(392),
            price: Decimal::new(1199, 2),
        },
        BeerDraft {
            beer_name: "Sunshine City".to_string(),
            beer_style: BeerStyle::Ipa,
            upc: "12356".to_string(),
            quantity_on_hand: Some(144),
            price: Decimal::new(1399, 2),
        },
    ]
}

pub fn sample_customers() -> Vec<CustomerDraft> {
    ["terry", "terry2", "terry3"]
        .into_iter()
        .map(|name| CustomerDraft {
            name: name.to_string(),
            email: None,
        })
        .collect()
}
