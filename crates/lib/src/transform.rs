//! # Row-to-Document Transformation
//!
//! Stateless mappers from relational rows to search-index documents. The
//! film mapper partitions the aggregated persons list by role; genre and
//! person rows map 1:1. Identical input always produces identical output,
//! which keeps re-delivery idempotent.

use crate::types::{
    FilmDocument, GenreDocument, GenreRow, PersonDocument, PersonRow, PersonSummary, RawFilmRow,
};

/// Builds the denormalized film document.
///
/// Persons are partitioned into `director`/`actor`/`writer` groups in source
/// order; any other role is excluded from every derived field. The name-only
/// lists and the `{id, name}` lists for a role are projections of the same
/// filtered sequence, so their membership and order always agree.
pub fn film_document(row: RawFilmRow) -> FilmDocument {
    let mut director = Vec::new();
    let mut actors_names = Vec::new();
    let mut writers_names = Vec::new();
    let mut actors = Vec::new();
    let mut writers = Vec::new();

    for person in &row.persons {
        match person.role.as_str() {
            "director" => director.push(person.name.clone()),
            "actor" => {
                actors_names.push(person.name.clone());
                actors.push(PersonSummary {
                    id: person.id.clone(),
                    name: person.name.clone(),
                });
            }
            "writer" => {
                writers_names.push(person.name.clone());
                writers.push(PersonSummary {
                    id: person.id.clone(),
                    name: person.name.clone(),
                });
            }
            _ => {}
        }
    }

    FilmDocument {
        id: row.id.to_string(),
        imdb_rating: row.rating,
        genre: row.genres,
        title: row.title,
        description: row.description,
        director,
        actors_names,
        writers_names,
        actors,
        writers,
    }
}

pub fn genre_document(row: GenreRow) -> GenreDocument {
    GenreDocument {
        id: row.id.to_string(),
        name: row.name,
        description: row.description,
    }
}

pub fn person_document(row: PersonRow) -> PersonDocument {
    PersonDocument {
        id: row.id.to_string(),
        full_name: row.full_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PersonRef;
    use chrono::Utc;
    use uuid::Uuid;

    fn person(role: &str, id: &str, name: &str) -> PersonRef {
        PersonRef {
            role: role.to_string(),
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn film_row(rating: Option<f64>, persons: Vec<PersonRef>) -> RawFilmRow {
        RawFilmRow {
            id: Uuid::new_v4(),
            title: "The Test".to_string(),
            description: Some("A film about testing.".to_string()),
            rating,
            kind: "movie".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            persons,
            genres: vec!["Drama".to_string()],
        }
    }

    #[test]
    fn partitions_persons_by_role_and_drops_unknown_roles() {
        let row = film_row(
            Some(8.0),
            vec![
                person("director", "p1", "Alice"),
                person("actor", "p2", "Bob"),
                person("writer", "p3", "Carol"),
                person("composer", "p4", "Mallory"),
                person("actor", "p5", "Dave"),
            ],
        );
        let doc = film_document(row);

        assert_eq!(doc.director, vec!["Alice"]);
        assert_eq!(doc.actors_names, vec!["Bob", "Dave"]);
        assert_eq!(doc.writers_names, vec!["Carol"]);
        // The {id, name} lists must mirror the name lists exactly.
        let actor_names: Vec<&str> = doc.actors.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(actor_names, doc.actors_names);
        let writer_names: Vec<&str> = doc.writers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(writer_names, doc.writers_names);
        // The unknown role appears nowhere.
        assert!(!doc.actors.iter().any(|p| p.name == "Mallory"));
        assert!(!doc.director.contains(&"Mallory".to_string()));
        assert!(!doc.writers_names.contains(&"Mallory".to_string()));
    }

    #[test]
    fn director_actor_pair_maps_into_the_expected_fields() {
        let row = film_row(
            None,
            vec![person("director", "p1", "Alice"), person("actor", "p2", "Bob")],
        );
        let doc = film_document(row);

        assert_eq!(doc.director, vec!["Alice"]);
        assert_eq!(doc.actors_names, vec!["Bob"]);
        assert!(doc.writers_names.is_empty());
        assert_eq!(
            doc.actors,
            vec![PersonSummary {
                id: "p2".to_string(),
                name: "Bob".to_string(),
            }]
        );
        assert!(doc.writers.is_empty());
    }

    #[test]
    fn null_rating_stays_null() {
        let doc = film_document(film_row(None, vec![]));
        assert_eq!(doc.imdb_rating, None);
    }

    #[test]
    fn numeric_rating_passes_through_as_float() {
        let doc = film_document(film_row(Some(7.5), vec![]));
        assert_eq!(doc.imdb_rating, Some(7.5));
    }

    #[test]
    fn genre_and_person_rows_map_one_to_one() {
        let genre_id = Uuid::new_v4();
        let genre = genre_document(GenreRow {
            id: genre_id,
            name: "Sci-Fi".to_string(),
            description: None,
        });
        assert_eq!(genre.id, genre_id.to_string());
        assert_eq!(genre.name, "Sci-Fi");
        assert_eq!(genre.description, None);

        let person_id = Uuid::new_v4();
        let person = person_document(PersonRow {
            id: person_id,
            full_name: "Grace Hopper".to_string(),
        });
        assert_eq!(person.id, person_id.to_string());
        assert_eq!(person.full_name, "Grace Hopper");
    }
}
