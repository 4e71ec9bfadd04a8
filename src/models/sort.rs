use crate::models::messages::role_label;
use crate::models::user::User;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Username,
    Email,
    Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "username" => Ok(SortColumn::Username),
            "email" => Ok(SortColumn::Email),
            "role" => Ok(SortColumn::Role),
            other => Err(format!("unknown sort column: {other}")),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortColumn::Username => "username",
            SortColumn::Email => "email",
            SortColumn::Role => "role",
        };
        f.write_str(name)
    }
}

/// Column and direction of the admin user table. `column` stays `None` until
/// the first header click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: the same column flips the direction, another column
    /// starts over ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.reversed();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Asc;
        }
    }

    /// Sorted copy of `users`; the input is left as is. Without a column the
    /// copy keeps server order.
    pub fn apply(&self, users: &[User]) -> Vec<User> {
        let mut sorted = users.to_vec();
        if let Some(column) = self.column {
            // No secondary key, so equal keys may come out in any order.
            sorted.sort_unstable_by(|a, b| {
                let ordering = compare(column, a, b);
                match self.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        sorted
    }
}

fn compare(column: SortColumn, a: &User, b: &User) -> Ordering {
    match column {
        SortColumn::Username => a.username.to_lowercase().cmp(&b.username.to_lowercase()),
        SortColumn::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        // Ordered by the displayed label, not by the flag itself.
        SortColumn::Role => role_label(a.is_admin).cmp(role_label(b.is_admin)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn user(id: i64, username: &str, email: &str, is_admin: bool) -> User {
        User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            is_admin,
        }
    }

    fn usernames(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.username.as_str()).collect()
    }

    #[test]
    fn username_sort_ignores_case() {
        let users = vec![user(1, "bob", "b@example.com", false), user(2, "Alice", "a@example.com", false)];
        let mut state = SortState::default();
        state.toggle(SortColumn::Username);

        assert_eq!(state.direction, SortDirection::Asc);
        assert_eq!(usernames(&state.apply(&users)), vec!["Alice", "bob"]);
    }

    #[test]
    fn second_click_on_same_column_descends() {
        let users = vec![user(1, "bob", "b@example.com", false), user(2, "Alice", "a@example.com", false)];
        let mut state = SortState::default();
        state.toggle(SortColumn::Username);
        state.toggle(SortColumn::Username);

        assert_eq!(state.direction, SortDirection::Desc);
        assert_eq!(usernames(&state.apply(&users)), vec!["bob", "Alice"]);
    }

    #[test]
    fn switching_column_resets_to_ascending() {
        let mut state = SortState::default();
        state.toggle(SortColumn::Username);
        state.toggle(SortColumn::Username);
        state.toggle(SortColumn::Email);

        assert_eq!(state.column, Some(SortColumn::Email));
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn role_sort_puts_administrators_first_ascending() {
        let users = vec![
            user(1, "zed", "z@example.com", false),
            user(2, "amy", "a@example.com", true),
            user(3, "kim", "k@example.com", false),
        ];
        let mut state = SortState::default();
        state.toggle(SortColumn::Role);

        let sorted = state.apply(&users);
        assert_eq!(sorted[0].username, "amy");
        assert!(sorted[1..].iter().all(|u| !u.is_admin));
    }

    #[test]
    fn apply_does_not_touch_canonical_list() {
        let users = vec![user(1, "bob", "b@example.com", false), user(2, "Alice", "a@example.com", false)];
        let mut state = SortState::default();
        state.toggle(SortColumn::Username);
        let _ = state.apply(&users);

        assert_eq!(usernames(&users), vec!["bob", "Alice"]);
    }

    #[test]
    fn unsorted_state_keeps_server_order() {
        let users = vec![user(1, "bob", "b@example.com", false), user(2, "Alice", "a@example.com", false)];
        assert_eq!(SortState::default().apply(&users), users);
    }

    #[test]
    fn column_parses_case_insensitively() {
        assert_eq!("Email".parse::<SortColumn>(), Ok(SortColumn::Email));
        assert!("created".parse::<SortColumn>().is_err());
    }

    fn arb_user() -> impl Strategy<Value = User> {
        (0i64..1000, "[a-zA-Z]{1,8}", "[a-zA-Z]{1,8}", any::<bool>()).prop_map(|(id, name, mail, is_admin)| User {
            id,
            username: name,
            email: format!("{mail}@example.com"),
            is_admin,
        })
    }

    fn arb_column() -> impl Strategy<Value = SortColumn> {
        prop_oneof![Just(SortColumn::Username), Just(SortColumn::Email), Just(SortColumn::Role)]
    }

    proptest! {
        #[test]
        fn double_click_restores_direction(column in arb_column(), start in arb_column()) {
            let mut state = SortState::default();
            state.toggle(start);
            let before = state;
            state.toggle(column);
            state.toggle(column);

            if column == start {
                prop_assert_eq!(state, before);
            } else {
                prop_assert_eq!(state.column, Some(column));
                prop_assert_eq!(state.direction, SortDirection::Desc);
            }
        }

        #[test]
        fn sorted_copy_is_a_permutation_in_order(users in prop::collection::vec(arb_user(), 0..20), column in arb_column()) {
            let mut state = SortState::default();
            state.toggle(column);
            let sorted = state.apply(&users);

            prop_assert_eq!(sorted.len(), users.len());
            for pair in sorted.windows(2) {
                prop_assert_ne!(compare(column, &pair[0], &pair[1]), Ordering::Greater);
            }

            let mut original_ids: Vec<i64> = users.iter().map(|u| u.id).collect();
            let mut sorted_ids: Vec<i64> = sorted.iter().map(|u| u.id).collect();
            original_ids.sort_unstable();
            sorted_ids.sort_unstable();
            prop_assert_eq!(original_ids, sorted_ids);
        }
    }
}
