//! Cart and checkout pricing basics against the in-memory store

use std::sync::Arc;

use tienda::store_database::MemoryStoreDatabase;
use tienda::Storefront;
use tienda_common::cart::CartProduct;
use tienda_common::checkout::{CheckoutForm, DocumentType};
use tienda_common::{fees, Amount};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let localstore = Arc::new(MemoryStoreDatabase::default());
    let storefront = Storefront::new("https://shop.example.com", localstore)?;

    storefront
        .add_product(
            CartProduct {
                id: "prod-1".to_string(),
                name: "Teclado mecanico".to_string(),
                price: Amount::from(60_000_u64),
                stock: 5,
            },
            1,
        )
        .await?;

    let cart = storefront
        .add_product(
            CartProduct {
                id: "prod-2".to_string(),
                name: "Mouse inalambrico".to_string(),
                price: Amount::from(35_000_u64),
                stock: 10,
            },
            2,
        )
        .await?;

    println!(
        "Cart: {} item(s) totalling {}",
        cart.total_quantity, cart.total_amount
    );

    for item in cart.items.values() {
        let totals = fees::order_total(item.subtotal()?)?;
        println!(
            "  {} x{} -> subtotal {} + fees {} = {}",
            item.name,
            item.quantity,
            totals.subtotal,
            totals.base_fee + totals.delivery_fee,
            totals.total
        );
    }

    let form = CheckoutForm {
        card_number: "4532 0151 1283 0366".to_string(),
        expiry_date: "12/28".to_string(),
        cvv: "123".to_string(),
        cardholder_name: "Maria Gomez".to_string(),
        document_type: DocumentType::Cc,
        document_number: "1020304050".to_string(),
        first_name: "Maria".to_string(),
        last_name: "Gomez".to_string(),
        email: "maria@example.com".to_string(),
        phone: "3001234567".to_string(),
        address: "Calle 12 # 34-56".to_string(),
        city: "Bogota".to_string(),
    };

    match form.validate() {
        Ok(()) => println!("Payment form is valid"),
        Err(errors) => {
            for error in &errors.errors {
                println!("  {}: {}", error.field, error.message);
            }
        }
    }

    Ok(())
}
