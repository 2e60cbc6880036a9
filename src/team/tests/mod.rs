//! Unit tests for the team bounded context.

mod domain_tests;
mod team_service_tests;

use crate::context::{RequestContext, RequestIdentity};
use crate::team::{
    adapters::memory::InMemoryTeamStore,
    domain::{EmailAddress, Event, User},
};
use mockable::DefaultClock;

fn register_user(store: &InMemoryTeamStore, email: &str) -> User {
    let address = EmailAddress::new(email).expect("valid email");
    let user = User::new(address, "Test", "User", &DefaultClock);
    store.insert_user(user.clone()).expect("user should be stored");
    user
}

fn register_event(store: &InMemoryTeamStore, title: &str) -> Event {
    let event = Event::new(title, &DefaultClock);
    store
        .insert_event(event.clone())
        .expect("event should be stored");
    event
}

fn context_for(user: &User) -> RequestContext {
    RequestContext::new(RequestIdentity::new(user.clone()))
}
