//! Test Helpers

use rust_decimal::Decimal;
use testresult::TestResult;
use wayfarer::{
    geo::Coordinate,
    purchases::{NewPurchaseToken, PurchaseToken},
    tours::{KeyPoint, NewKeyPoint, NewTour, Tour, TourUuid},
};

use crate::{
    domain::{
        purchases::{repository::PurchaseTokensRepository, token::generate_purchase_token},
        tours::ToursService,
    },
    test::TestContext,
};

pub(crate) async fn create_tour(ctx: &TestContext, name: &str) -> TestResult<Tour> {
    let tour = ctx
        .tours
        .create_tour(
            ctx.guide.clone(),
            NewTour {
                name: name.to_string(),
                description: format!("{name} description"),
                difficulty: "easy".to_string(),
                tags: vec!["history".to_string()],
            },
        )
        .await?;

    Ok(tour)
}

pub(crate) async fn create_published_tour(
    ctx: &TestContext,
    name: &str,
    price: Decimal,
) -> TestResult<Tour> {
    let tour = create_tour(ctx, name).await?;

    let tour = ctx
        .tours
        .publish_tour(ctx.guide.clone(), tour.uuid, price)
        .await?;

    Ok(tour)
}

pub(crate) fn new_key_point(
    name: &str,
    latitude: f64,
    longitude: f64,
    order: i32,
) -> TestResult<NewKeyPoint> {
    Ok(NewKeyPoint {
        coordinate: Coordinate::new(latitude, longitude)?,
        name: name.to_string(),
        description: String::new(),
        image: None,
        order,
    })
}

pub(crate) async fn add_key_point(
    ctx: &TestContext,
    tour: TourUuid,
    name: &str,
    latitude: f64,
    longitude: f64,
    order: i32,
) -> TestResult<KeyPoint> {
    let key_point = ctx
        .tours
        .add_key_point(
            ctx.guide.clone(),
            tour,
            new_key_point(name, latitude, longitude, order)?,
        )
        .await?;

    Ok(key_point)
}

/// Record a purchase of `tour` by the context's tourist, bypassing the cart.
pub(crate) async fn buy(ctx: &TestContext, tour: TourUuid) -> TestResult<PurchaseToken> {
    let token = ctx
        .store
        .create_token(NewPurchaseToken {
            tourist: ctx.tourist.clone(),
            tour,
            token: generate_purchase_token(),
        })
        .await?;

    Ok(token)
}
