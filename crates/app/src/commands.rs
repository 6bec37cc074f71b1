//! Command implementations and terminal output.

use bazaar_application::Session;
use bazaar_application::ports::{ApiError, AuthEvents, CartRepository, CredentialStore, HttpClient};
use bazaar_domain::{Credentials, ProductId, ProductQuery, Registration, User};

pub async fn list_products<H, C, R, E>(
    session: &Session<H, C, R, E>,
    query: &ProductQuery,
) -> Result<(), ApiError>
where
    H: HttpClient,
    C: CredentialStore,
    R: CartRepository,
    E: AuthEvents,
{
    let products = session.api().products(query).await?;
    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }
    for product in products {
        let category = product.category_name.as_deref().unwrap_or("-");
        println!(
            "{:>6}  {:<30}  {:>10}  {}",
            product.id, product.name, product.price, category
        );
    }
    Ok(())
}

pub async fn show_product<H, C, R, E>(
    session: &Session<H, C, R, E>,
    id: ProductId,
) -> Result<(), ApiError>
where
    H: HttpClient,
    C: CredentialStore,
    R: CartRepository,
    E: AuthEvents,
{
    let product = session.api().product(id).await?;
    println!("{} (#{})", product.name, product.id);
    println!("price: {}", product.price);
    if let Some(category) = &product.category_name {
        println!("category: {category}");
    }
    if let Some(stock) = product.stock {
        println!("stock: {stock}");
    }
    if let Some(description) = &product.description {
        println!("\n{description}");
    }
    Ok(())
}

pub async fn list_categories<H, C, R, E>(session: &Session<H, C, R, E>) -> Result<(), ApiError>
where
    H: HttpClient,
    C: CredentialStore,
    R: CartRepository,
    E: AuthEvents,
{
    for category in session.api().categories().await? {
        println!("{:>6}  {}", category.id, category.name);
    }
    Ok(())
}

pub async fn register<H, C, R, E>(
    session: &Session<H, C, R, E>,
    registration: &Registration,
) -> Result<(), ApiError>
where
    H: HttpClient,
    C: CredentialStore,
    R: CartRepository,
    E: AuthEvents,
{
    let user = session.api().register(registration).await?;
    println!("account created for {}", user.username);
    println!("run `bazaar login -u {}` to sign in", user.username);
    Ok(())
}

pub async fn login<H, C, R, E>(
    session: &mut Session<H, C, R, E>,
    credentials: &Credentials,
) -> Result<(), ApiError>
where
    H: HttpClient,
    C: CredentialStore,
    R: CartRepository,
    E: AuthEvents,
{
    session.login(credentials).await?;
    match session.claims().and_then(|c| c.user_id) {
        Some(user_id) => println!("logged in as {} (user #{user_id})", credentials.username),
        None => println!("logged in as {}", credentials.username),
    }
    Ok(())
}

pub async fn show_profile<H, C, R, E>(session: &Session<H, C, R, E>) -> Result<(), ApiError>
where
    H: HttpClient,
    C: CredentialStore,
    R: CartRepository,
    E: AuthEvents,
{
    let user = session.api().me().await?;
    print_user(&user);
    Ok(())
}

fn print_user(user: &User) {
    println!("{} (#{})", user.username, user.id);
    if let Some(email) = &user.email {
        println!("email: {email}");
    }
    if let Some(phone) = &user.phone_number {
        println!("phone: {phone}");
    }
    if let Some(address) = &user.address {
        println!("address: {address}");
    }
}

pub fn show_cart<H, C, R, E>(session: &Session<H, C, R, E>)
where
    H: HttpClient,
    C: CredentialStore,
    R: CartRepository,
    E: AuthEvents,
{
    let cart = session.cart().cart();
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }
    for line in &cart.items {
        println!(
            "{:>6}  {:<30}  {:>3} x {:>10} = {:>10}",
            line.product_id,
            line.name,
            line.quantity,
            line.unit_price,
            line.line_total()
        );
    }
    println!(
        "\n{} item(s), total {}",
        session.cart().item_count(),
        session.cart().total()
    );
}
