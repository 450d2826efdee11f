//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::NaiveDateTime;
use gridpage::{fetch_block, parse_date, FilterModel, MemorySource, QueryOptions, Record, RowRangeRequest};

#[derive(Debug, Clone, PartialEq, Record)]
pub struct User {
    #[grid(number)]
    pub id: i64,
    #[grid(text)]
    pub full_name: Option<String>,
    #[grid(date)]
    pub registered_on: NaiveDateTime,
    #[grid(number)]
    pub age: i32,
    #[grid(boolean)]
    pub is_verified: bool,
}

impl User {
    pub fn new(id: i64) -> Self {
        User {
            id,
            full_name: None,
            registered_on: date("2020-01-01 00:00:00"),
            age: 0,
            is_verified: false,
        }
    }

    pub fn named(mut self, full_name: &str) -> Self {
        self.full_name = Some(full_name.to_string());
        self
    }

    pub fn aged(mut self, age: i32) -> Self {
        self.age = age;
        self
    }

    pub fn registered(mut self, on: &str) -> Self {
        self.registered_on = date(on);
        self
    }

    pub fn verified(mut self, is_verified: bool) -> Self {
        self.is_verified = is_verified;
        self
    }
}

pub fn date(s: &str) -> NaiveDateTime {
    parse_date(s).unwrap_or_else(|| panic!("bad fixture date {s}"))
}

/// Users named `names[i]` with ids starting at 1.
pub fn named_users(names: &[&str]) -> Vec<User> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| User::new(i as i64 + 1).named(name))
        .collect()
}

/// Users aged `ages[i]` with ids starting at 1.
pub fn aged_users(ages: &[i32]) -> Vec<User> {
    ages.iter()
        .enumerate()
        .map(|(i, age)| User::new(i as i64 + 1).aged(*age))
        .collect()
}

/// Users registered on `dates[i]` with ids starting at 1.
pub fn registered_users(dates: &[&str]) -> Vec<User> {
    dates
        .iter()
        .enumerate()
        .map(|(i, on)| User::new(i as i64 + 1).registered(on))
        .collect()
}

/// Runs a full-range request and returns the ids in block order.
pub fn fetch_ids(users: &[User], request: &RowRangeRequest, options: &QueryOptions) -> Vec<i64> {
    let page = fetch_block(&MemorySource::new(users), request, options).unwrap();
    page.rows_this_block.iter().map(|u| u.id).collect()
}

/// Ids of the users matching a single column filter.
pub fn filter_ids(users: &[User], column: &str, model: FilterModel) -> Vec<i64> {
    filter_ids_with(users, column, model, &QueryOptions::default())
}

pub fn filter_ids_with(
    users: &[User],
    column: &str,
    model: FilterModel,
    options: &QueryOptions,
) -> Vec<i64> {
    let request = RowRangeRequest::new(0, 100).filter(column, model);
    fetch_ids(users, &request, options)
}
