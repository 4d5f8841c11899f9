//! Referential integrity policy.
//!
//! Foreign keys in the schema carry no `ON DELETE` action. Deletes instead
//! run a plan derived from [`REFERENCES`]: restrict checks, then set-null
//! updates, then cascaded deletes deepest-first, then the root row. The
//! executor runs every step of a plan in one transaction, binding the root
//! id to `$1`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    UserGroups,
    Categories,
    MenuItems,
    Carts,
    Orders,
    OrderItems,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "auth_user",
            Table::UserGroups => "auth_user_groups",
            Table::Categories => "categories",
            Table::MenuItems => "menu_items",
            Table::Carts => "carts",
            Table::Orders => "orders",
            Table::OrderItems => "order_items",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    Restrict,
    SetNull,
}

/// `child.column` points at `parent.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub child: Table,
    pub column: &'static str,
    pub parent: Table,
    pub on_delete: OnDelete,
}

pub const REFERENCES: &[Reference] = &[
    Reference {
        child: Table::MenuItems,
        column: "category_id",
        parent: Table::Categories,
        on_delete: OnDelete::Restrict,
    },
    Reference {
        child: Table::Carts,
        column: "user_id",
        parent: Table::Users,
        on_delete: OnDelete::Cascade,
    },
    Reference {
        child: Table::Carts,
        column: "menuitem_id",
        parent: Table::MenuItems,
        on_delete: OnDelete::Cascade,
    },
    Reference {
        child: Table::Orders,
        column: "user_id",
        parent: Table::Users,
        on_delete: OnDelete::Cascade,
    },
    Reference {
        child: Table::Orders,
        column: "delivery_crew_id",
        parent: Table::Users,
        on_delete: OnDelete::SetNull,
    },
    Reference {
        child: Table::OrderItems,
        column: "order_id",
        parent: Table::Orders,
        on_delete: OnDelete::Cascade,
    },
    Reference {
        child: Table::OrderItems,
        column: "menuitem_id",
        parent: Table::MenuItems,
        on_delete: OnDelete::Cascade,
    },
    Reference {
        child: Table::UserGroups,
        column: "user_id",
        parent: Table::Users,
        on_delete: OnDelete::Cascade,
    },
];

/// A blocking reference. `sql` selects a single boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictCheck {
    pub referenced_by: Table,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub root: Table,
    pub checks: Vec<RestrictCheck>,
    pub updates: Vec<String>,
    /// Cascaded deletes followed by the root delete, in execution order.
    pub deletes: Vec<String>,
}

pub fn plan_delete(root: Table) -> DeletePlan {
    let mut plan = DeletePlan {
        root,
        checks: Vec::new(),
        updates: Vec::new(),
        deletes: Vec::new(),
    };
    let mut cascaded = Vec::new();
    walk(root, "id = $1", true, &mut plan, &mut cascaded);

    cascaded.reverse();
    plan.deletes = cascaded;
    plan.deletes
        .push(format!("DELETE FROM {} WHERE id = $1", root.name()));
    plan
}

/// Collects the steps for every reference into `table`. `predicate` selects
/// the rows of `table` being removed.
fn walk(table: Table, predicate: &str, is_root: bool, plan: &mut DeletePlan, cascaded: &mut Vec<String>) {
    for reference in REFERENCES.iter().filter(|r| r.parent == table) {
        let child_predicate = if is_root {
            format!("{} = $1", reference.column)
        } else {
            format!(
                "{} IN (SELECT id FROM {} WHERE {})",
                reference.column,
                table.name(),
                predicate
            )
        };

        match reference.on_delete {
            OnDelete::Restrict => plan.checks.push(RestrictCheck {
                referenced_by: reference.child,
                sql: format!(
                    "SELECT EXISTS (SELECT 1 FROM {} WHERE {})",
                    reference.child.name(),
                    child_predicate
                ),
            }),
            OnDelete::SetNull => plan.updates.push(format!(
                "UPDATE {} SET {} = NULL WHERE {}",
                reference.child.name(),
                reference.column,
                child_predicate
            )),
            OnDelete::Cascade => {
                cascaded.push(format!(
                    "DELETE FROM {} WHERE {}",
                    reference.child.name(),
                    child_predicate
                ));
                walk(reference.child, &child_predicate, false, plan, cascaded);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_delete_is_restricted() {
        let plan = plan_delete(Table::Categories);
        assert_eq!(plan.checks.len(), 1);
        assert_eq!(plan.checks[0].referenced_by, Table::MenuItems);
        assert_eq!(
            plan.checks[0].sql,
            "SELECT EXISTS (SELECT 1 FROM menu_items WHERE category_id = $1)"
        );
        assert_eq!(plan.deletes, vec!["DELETE FROM categories WHERE id = $1"]);
    }

    #[test]
    fn test_menu_item_delete_cascades_to_lines() {
        let plan = plan_delete(Table::MenuItems);
        assert!(plan.checks.is_empty());
        assert_eq!(
            plan.deletes,
            vec![
                "DELETE FROM order_items WHERE menuitem_id = $1",
                "DELETE FROM carts WHERE menuitem_id = $1",
                "DELETE FROM menu_items WHERE id = $1",
            ]
        );
    }

    #[test]
    fn test_order_delete_removes_items_first() {
        let plan = plan_delete(Table::Orders);
        assert_eq!(
            plan.deletes,
            vec![
                "DELETE FROM order_items WHERE order_id = $1",
                "DELETE FROM orders WHERE id = $1",
            ]
        );
    }

    #[test]
    fn test_user_delete_nulls_crew_and_nests_cascades() {
        let plan = plan_delete(Table::Users);
        assert_eq!(
            plan.updates,
            vec!["UPDATE orders SET delivery_crew_id = NULL WHERE delivery_crew_id = $1"]
        );

        let nested = plan
            .deletes
            .iter()
            .position(|sql| sql == "DELETE FROM order_items WHERE order_id IN (SELECT id FROM orders WHERE user_id = $1)")
            .unwrap();
        let orders = plan
            .deletes
            .iter()
            .position(|sql| sql == "DELETE FROM orders WHERE user_id = $1")
            .unwrap();
        assert!(nested < orders);
        assert_eq!(plan.deletes.last().unwrap(), "DELETE FROM auth_user WHERE id = $1");
    }
}
