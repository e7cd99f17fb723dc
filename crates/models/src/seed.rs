use crate::movie::Movie;

const CATALOGUE: [(i64, &str, i32, &str, &str, u8); 10] = [
    (1, "Побег из Шоушенка", 1994, "Фрэнк Дарабонт", "02:22:00", 9),
    (2, "Крёстный отец", 1972, "Фрэнсис Форд Коппола", "02:55:00", 9),
    (3, "Тёмный рыцарь", 2008, "Кристофер Нолан", "02:32:00", 9),
    (4, "Криминальное чтиво", 1994, "Квентин Тарантино", "02:34:00", 8),
    (5, "Властелин колец: Возвращение короля", 2003, "Питер Джексон", "03:21:00", 9),
    (6, "Форрест Гамп", 1994, "Роберт Земекис", "02:22:00", 8),
    (7, "Начало", 2010, "Кристофер Нолан", "02:28:00", 8),
    (8, "Бойцовский клуб", 1999, "Дэвид Финчер", "02:19:00", 8),
    (9, "Матрица", 1999, "Лана Вачовски, Лилли Вачовски", "02:16:00", 8),
    (10, "Славные парни", 1990, "Мартин Скорсезе", "02:26:00", 8),
];

/// The ten records the service starts with, ids 1 through 10.
pub fn default_movies() -> Vec<Movie> {
    CATALOGUE
        .iter()
        .map(|&(id, title, year, director, length, rating)| Movie {
            id,
            title: title.to_string(),
            year,
            director: director.to_string(),
            length: length.to_string(),
            rating,
        })
        .collect()
}
