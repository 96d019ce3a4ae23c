//! Order queries and the nested order create.

use std::collections::HashMap;

use diesel::prelude::*;
use tracing::{debug, info};

use super::database::model::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};
use super::database::schema::{books, customers, order_items, orders};
use crate::domain::money::{price_from_f64, price_to_f64};
use crate::domain::stats::order_total;
use crate::domain::{Order, OrderDetails, OrderItemDetail, OrderLine, OrderStatus};
use crate::error::{Error, Result};

/// Attach customer names and items to loaded order rows.
fn attach_details(
    conn: &mut SqliteConnection,
    headers: Vec<(OrderRow, Option<String>, Option<String>)>,
) -> Result<Vec<OrderDetails>> {
    let ids: Vec<i32> = headers.iter().map(|(order, _, _)| order.id).collect();
    let item_rows: Vec<(OrderItemRow, Option<String>)> = order_items::table
        .left_join(books::table)
        .filter(order_items::order_id.eq_any(ids))
        .select((OrderItemRow::as_select(), books::title.nullable()))
        .order((order_items::order_id.asc(), order_items::id.asc()))
        .load(conn)?;

    let mut items_by_order: HashMap<i32, Vec<OrderItemDetail>> = HashMap::new();
    for (item, book_title) in item_rows {
        items_by_order
            .entry(item.order_id)
            .or_default()
            .push(OrderItemDetail {
                book_title,
                quantity: item.quantity,
                price_at_purchase: price_from_f64(item.price_at_purchase),
            });
    }

    headers
        .into_iter()
        .map(|(order, first_name, last_name)| {
            let customer_name = match (first_name, last_name) {
                (Some(first), Some(last)) => Some(format!("{first} {last}")),
                _ => None,
            };
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            Ok(OrderDetails {
                order: Order::try_from(order)?,
                customer_name,
                items,
            })
        })
        .collect()
}

/// The first `limit` orders with customer name and items.
///
/// # Errors
/// Returns an error if a query fails or a stored status is unknown.
pub fn with_details(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<OrderDetails>> {
    let headers = orders::table
        .left_join(customers::table)
        .select((
            OrderRow::as_select(),
            customers::first_name.nullable(),
            customers::last_name.nullable(),
        ))
        .order(orders::id.asc())
        .limit(limit)
        .load(conn)?;
    attach_details(conn, headers)
}

/// One order with customer name and items.
///
/// # Errors
/// Returns an error if a query fails or a stored status is unknown.
pub fn details(conn: &mut SqliteConnection, id: i32) -> Result<Option<OrderDetails>> {
    let headers = orders::table
        .left_join(customers::table)
        .filter(orders::id.eq(id))
        .select((
            OrderRow::as_select(),
            customers::first_name.nullable(),
            customers::last_name.nullable(),
        ))
        .load(conn)?;
    Ok(attach_details(conn, headers)?.pop())
}

/// Create an order and all of its items in one transaction.
///
/// The order total is the sum of the line subtotals.
///
/// # Errors
/// Returns [`Error::Validation`] for an empty order, or the first failing
/// statement; nothing is written in either case.
pub fn create(
    conn: &mut SqliteConnection,
    customer_id: i32,
    status: OrderStatus,
    lines: &[OrderLine],
) -> Result<OrderDetails> {
    if lines.is_empty() {
        return Err(Error::Validation("an order needs at least one item".into()));
    }
    let total = order_total(lines);

    conn.transaction::<_, Error, _>(|conn| {
        let order_id: i32 = diesel::insert_into(orders::table)
            .values(NewOrderRow {
                customer_id: Some(customer_id),
                status: status.as_str(),
                total_amount: price_to_f64(total),
            })
            .returning(orders::id)
            .get_result(conn)?;

        for line in lines {
            diesel::insert_into(order_items::table)
                .values(NewOrderItemRow::for_line(order_id, line))
                .execute(conn)?;
        }
        info!(order_id, customer_id, items = lines.len(), %total, "Created order");

        details(conn, order_id)?.ok_or_else(|| Error::not_found("order", order_id))
    })
}

/// Delete an order; its items go with it.
///
/// Returns whether an order was deleted.
///
/// # Errors
/// Returns an error if the delete fails.
pub fn delete(conn: &mut SqliteConnection, id: i32) -> Result<bool> {
    let deleted = diesel::delete(orders::table.find(id)).execute(conn)?;
    debug!(order_id = id, deleted, "Deleted order");
    Ok(deleted > 0)
}

/// Count the stored items of an order.
///
/// # Errors
/// Returns an error if the query fails.
pub fn item_count(conn: &mut SqliteConnection, order_id: i32) -> Result<i64> {
    Ok(order_items::table
        .filter(order_items::order_id.eq(order_id))
        .count()
        .get_result(conn)?)
}
