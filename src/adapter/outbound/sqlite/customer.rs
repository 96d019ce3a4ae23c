//! Customer queries and mutations.

use diesel::prelude::*;
use tracing::debug;

use super::database::model::{CustomerRow, NewCustomerRow, OrderRow};
use super::database::schema::{customers, orders};
use crate::domain::money::{price_to_f64, Price};
use crate::domain::{Customer, CustomerOrders, NewCustomer, Order, OrderSummary};
use crate::error::{Error, Result};

/// Customer with the given email.
///
/// # Errors
/// Returns an error if the query fails.
pub fn find_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<Customer>> {
    let row: Option<CustomerRow> = customers::table
        .select(CustomerRow::as_select())
        .filter(customers::email.eq(email))
        .first(conn)
        .optional()?;
    Ok(row.map(Customer::from))
}

/// The customer with the lowest id.
///
/// # Errors
/// Returns an error if the query fails.
pub fn first(conn: &mut SqliteConnection) -> Result<Option<Customer>> {
    let row: Option<CustomerRow> = customers::table
        .select(CustomerRow::as_select())
        .order(customers::id.asc())
        .first(conn)
        .optional()?;
    Ok(row.map(Customer::from))
}

/// Create a customer keyed on email, or update the phone of an existing one.
///
/// # Errors
/// Returns an error if the statement fails.
pub fn upsert_phone(conn: &mut SqliteConnection, customer: &NewCustomer) -> Result<Customer> {
    let row: CustomerRow = diesel::insert_into(customers::table)
        .values(NewCustomerRow::from(customer))
        .on_conflict(customers::email)
        .do_update()
        .set(customers::phone.eq(customer.phone.as_deref()))
        .returning(CustomerRow::as_returning())
        .get_result(conn)?;
    debug!(email = %row.email, id = row.id, "Upserted customer");
    Ok(Customer::from(row))
}

/// Delete the customer with this email.
///
/// Returns `None` when there was no such customer.
///
/// # Errors
/// Returns an error if the delete fails.
pub fn delete_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<Customer>> {
    let target = customers::table.filter(customers::email.eq(email));
    let row: Option<CustomerRow> = diesel::delete(target)
        .returning(CustomerRow::as_returning())
        .get_result(conn)
        .optional()?;
    Ok(row.map(Customer::from))
}

/// Insert customers, skipping emails that already exist.
///
/// Returns how many rows were actually inserted.
///
/// # Errors
/// Returns an error if an insert fails for any reason other than a
/// duplicate email.
pub fn insert_many(conn: &mut SqliteConnection, new: &[NewCustomer]) -> Result<usize> {
    conn.transaction::<_, Error, _>(|conn| {
        let mut inserted = 0;
        for customer in new {
            inserted += diesel::insert_into(customers::table)
                .values(NewCustomerRow::from(customer))
                .on_conflict(customers::email)
                .do_nothing()
                .execute(conn)?;
        }
        debug!(requested = new.len(), inserted, "Inserted customers");
        Ok(inserted)
    })
}

/// The `limit` most recently created customers, newest first.
///
/// # Errors
/// Returns an error if the query fails.
pub fn recent(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<Customer>> {
    let rows: Vec<CustomerRow> = customers::table
        .select(CustomerRow::as_select())
        .order(customers::id.desc())
        .limit(limit)
        .load(conn)?;
    Ok(rows.into_iter().map(Customer::from).collect())
}

/// Customers with at least one order above `amount`.
///
/// Only the orders above `amount` are attached to each customer.
///
/// # Errors
/// Returns an error if the query fails or a stored status is unknown.
pub fn with_orders_over(conn: &mut SqliteConnection, amount: Price) -> Result<Vec<CustomerOrders>> {
    let rows: Vec<(CustomerRow, OrderRow)> = orders::table
        .inner_join(customers::table)
        .filter(orders::total_amount.gt(price_to_f64(amount)))
        .select((CustomerRow::as_select(), OrderRow::as_select()))
        .order((customers::id.asc(), orders::id.asc()))
        .load(conn)?;

    let mut grouped: Vec<CustomerOrders> = Vec::new();
    for (customer, order) in rows {
        let order = Order::try_from(order)?;
        let summary = OrderSummary {
            id: order.id,
            total_amount: order.total_amount,
            status: order.status,
        };
        match grouped.last_mut() {
            Some(last) if last.customer.id == customer.id => last.orders.push(summary),
            _ => grouped.push(CustomerOrders {
                customer: Customer::from(customer),
                orders: vec![summary],
            }),
        }
    }
    Ok(grouped)
}
